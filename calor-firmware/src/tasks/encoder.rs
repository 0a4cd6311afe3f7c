//! Encoder service task
//!
//! Samples the encoder pins every millisecond so no quadrature edge or
//! button press is missed while the main loop is busy drawing.

use defmt::*;
use embassy_time::{Duration, Instant, Ticker};

use crate::channels::{Encoder, ENCODER};

/// Service interval in milliseconds
pub const SERVICE_INTERVAL_MS: u64 = 1;

/// Encoder task - owns the sampling cadence, shares state with the main loop
#[embassy_executor::task]
pub async fn encoder_task(encoder: Encoder) {
    info!("Encoder task started");

    ENCODER.lock(|cell| cell.replace(Some(encoder)));

    let mut ticker = Ticker::every(Duration::from_millis(SERVICE_INTERVAL_MS));
    loop {
        ticker.next().await;

        let now_ms = Instant::now().as_millis() as u32;
        ENCODER.lock(|cell| {
            if let Some(encoder) = cell.borrow_mut().as_mut() {
                encoder.service(now_ms);
            }
        });
    }
}
