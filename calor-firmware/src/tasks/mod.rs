//! Embassy async tasks
//!
//! The station logic itself runs in the main loop; these tasks only move
//! bytes and encoder samples in and out of it.

pub mod encoder;
pub mod serial_rx;
pub mod serial_tx;

pub use encoder::encoder_task;
pub use serial_rx::serial_rx_task;
pub use serial_tx::serial_tx_task;
