//! Serial receive task
//!
//! Splits the byte stream into lines, parses commands and hands them to
//! the main loop. Lines that fail to parse are answered right here.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use calor_protocol::{Command, LineParser, Reply};

use crate::channels::{send, Outgoing, COMMAND_CHANNEL};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 32;

/// Serial RX task - receives and parses command lines
#[embassy_executor::task]
pub async fn serial_rx_task(mut rx: BufferedUartRx) {
    info!("Serial RX task started");

    let mut parser = LineParser::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                for &byte in &buf[..n] {
                    match parser.feed(byte) {
                        Ok(Some(line)) => match Command::parse(&line) {
                            Ok(command) => {
                                debug!("Command: {:?}", command);
                                COMMAND_CHANNEL.send(command).await;
                            }
                            Err(e) => {
                                warn!("Rejected command line: {:?}", e);
                                send(Outgoing::Reply(Reply::from(e)));
                            }
                        },
                        Ok(None) => {}
                        Err(e) => {
                            warn!("Line framing error: {:?}", e);
                            send(Outgoing::Reply(Reply::UnknownCommand));
                        }
                    }
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!("UART read error: {:?}", e);
                parser.reset();
            }
        }
    }
}
