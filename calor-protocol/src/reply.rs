//! Answers to serial commands

use core::fmt::{self, Write};

use heapless::String;

use crate::command::{CommandError, Gain};

/// Longest reply line (excluding the terminator)
pub const MAX_REPLY_LEN: usize = 64;

/// A formatted reply line
pub type ReplyLine = String<MAX_REPLY_LEN>;

/// Reply to a serial command
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reply {
    /// A gain was changed on the running controller
    GainChanged(Gain, f32),
    /// Current running gains
    Tunings {
        /// Proportional gain
        p: f32,
        /// Integral gain
        i: f32,
        /// Derivative gain
        d: f32,
    },
    /// Setpoint after applying the command
    Setpoint(f32),
    /// Gains were persisted
    SettingsSaved,
    /// Gains could not be persisted
    SaveFailed,
    /// Factory defaults restored, restart pending
    FactoryReset,
    /// Unrecognised command
    UnknownCommand,
    /// Known command with an unusable argument
    InvalidValue,
}

impl From<CommandError> for Reply {
    fn from(e: CommandError) -> Self {
        match e {
            CommandError::Unknown => Reply::UnknownCommand,
            CommandError::InvalidValue => Reply::InvalidValue,
        }
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::GainChanged(gain, value) => {
                write!(f, "changed {} value to: {:.2}", gain.label(), value)
            }
            Reply::Tunings { p, i, d } => {
                write!(f, "The tunings  P: {:.2}, I: {:.2}, D: {:.2}", p, i, d)
            }
            Reply::Setpoint(value) => write!(f, "Setpoint: {:.2}", value),
            Reply::SettingsSaved => f.write_str("Settings saved!"),
            Reply::SaveFailed => f.write_str("Save failed!"),
            Reply::FactoryReset => f.write_str("Reseted!"),
            Reply::UnknownCommand => f.write_str("Unknown command!"),
            Reply::InvalidValue => f.write_str("Invalid value!"),
        }
    }
}

impl Reply {
    /// Format the reply into a fixed-capacity line
    pub fn to_line(&self) -> ReplyLine {
        let mut line = ReplyLine::new();
        // Overflow truncates the line
        let _ = write!(line, "{}", self);
        line
    }
}
