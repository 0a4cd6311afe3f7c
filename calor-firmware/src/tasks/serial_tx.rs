//! Serial transmit task
//!
//! Prints command replies and telemetry lines, CRLF terminated.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use crate::channels::{Outgoing, OUTBOX};

/// Serial TX task - drains the outbox
#[embassy_executor::task]
pub async fn serial_tx_task(mut tx: BufferedUartTx) {
    info!("Serial TX task started");

    if let Err(e) = tx.write_all(b"* START *\r\n").await {
        warn!("Failed to send banner: {:?}", e);
    }

    loop {
        let result = match OUTBOX.receive().await {
            Outgoing::Reply(reply) => write_line(&mut tx, reply.to_line().as_bytes()).await,
            Outgoing::Telemetry(telemetry) => {
                write_line(&mut tx, telemetry.to_line().as_bytes()).await
            }
        };

        if let Err(e) = result {
            warn!("UART write error: {:?}", e);
        }
    }
}

async fn write_line(
    tx: &mut BufferedUartTx,
    line: &[u8],
) -> Result<(), embassy_rp::uart::Error> {
    tx.write_all(line).await?;
    tx.write_all(b"\r\n").await
}
