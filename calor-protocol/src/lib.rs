//! Calor wire-level vocabulary
//!
//! Everything that crosses the boundary between the station logic and the
//! outside world, independent of how it is produced or consumed:
//!
//! - [`input`]: the once-per-poll encoder snapshot (signed step delta plus
//!   at most one button event)
//! - [`command`]: the line-oriented serial command set
//!   (`p:`, `i:`, `d:`, `t`, `t:`, `s`, `r`) and its line framer
//! - [`reply`]: the text answers to those commands
//! - [`telemetry`]: the periodic space-separated status line
//!
//! ```text
//! > p:4.5
//! changed P value to: 4.50
//! > t
//! The tunings  P: 4.50, I: 0.00, D: 1.80
//! 300.00 298.75 12.73 4.50 0.00 1.80 0 150.00 60
//! ```

#![no_std]
#![deny(unsafe_code)]

pub mod command;
pub mod input;
pub mod reply;
pub mod telemetry;

pub use command::{Command, CommandError, Gain, LineError, LineParser, MAX_LINE_LEN};
pub use input::{ButtonEvent, InputSnapshot};
pub use reply::{Reply, ReplyLine, MAX_REPLY_LEN};
pub use telemetry::{Telemetry, TelemetryLine, MAX_TELEMETRY_LEN};
