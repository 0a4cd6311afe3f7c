//! Inter-task communication channels
//!
//! The serial tasks talk to the main loop through these. The encoder is
//! shared through a blocking mutex since it is serviced from its own task.

use core::cell::RefCell;

use embassy_rp::gpio::Input;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::channel::Channel;

use calor_drivers::input::ClickEncoder;
use calor_protocol::{Command, InputSnapshot, Reply, Telemetry};

/// Channel capacity for parsed serial commands
const COMMAND_CHANNEL_SIZE: usize = 4;

/// Channel capacity for outgoing serial lines
const OUTBOX_CHANNEL_SIZE: usize = 8;

/// Rotary encoder on three GPIO inputs
pub type Encoder = ClickEncoder<Input<'static>, Input<'static>, Input<'static>>;

/// Something to print on the serial port
#[derive(Debug, Clone, Copy)]
pub enum Outgoing {
    Reply(Reply),
    Telemetry(Telemetry),
}

/// Commands parsed by the serial RX task
pub static COMMAND_CHANNEL: Channel<CriticalSectionRawMutex, Command, COMMAND_CHANNEL_SIZE> =
    Channel::new();

/// Lines waiting for the serial TX task
pub static OUTBOX: Channel<CriticalSectionRawMutex, Outgoing, OUTBOX_CHANNEL_SIZE> =
    Channel::new();

/// Encoder shared between the encoder task and the main loop
pub static ENCODER: Mutex<CriticalSectionRawMutex, RefCell<Option<Encoder>>> =
    Mutex::new(RefCell::new(None));

/// Queue a line for transmission, dropping it if the outbox is full
pub fn send(line: Outgoing) {
    if OUTBOX.try_send(line).is_err() {
        defmt::warn!("Serial outbox full, dropping line");
    }
}

/// Collect everything the encoder saw since the previous call
pub fn take_input() -> InputSnapshot {
    ENCODER.lock(|encoder| {
        encoder
            .borrow_mut()
            .as_mut()
            .map(|encoder| encoder.take_snapshot())
            .unwrap_or(InputSnapshot::IDLE)
    })
}
