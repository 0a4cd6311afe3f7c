//! Serial command set
//!
//! Commands are single lines identified by a two-character prefix:
//!
//! | line        | effect                         |
//! |-------------|--------------------------------|
//! | `p:<float>` | set proportional gain          |
//! | `i:<float>` | set integral gain              |
//! | `d:<float>` | set derivative gain            |
//! | `t`         | print current gains            |
//! | `t:<float>` | set setpoint                   |
//! | `s`         | persist current gains          |
//! | `r`         | factory reset                  |
//!
//! Anything else is an unknown command and must not change any state.

use core::str::FromStr;

use heapless::String;

/// Longest accepted command line (excluding the terminator)
pub const MAX_LINE_LEN: usize = 32;

/// PID gain selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gain {
    /// Proportional
    P,
    /// Integral
    I,
    /// Derivative
    D,
}

impl Gain {
    /// Single-letter label used in replies
    pub fn label(self) -> char {
        match self {
            Gain::P => 'P',
            Gain::I => 'I',
            Gain::D => 'D',
        }
    }
}

/// A parsed serial command
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Set one PID gain on the running controller
    SetGain(Gain, f32),
    /// Print the running PID gains
    PrintTunings,
    /// Set the target temperature
    SetSetpoint(f32),
    /// Persist the running PID gains
    SaveTunings,
    /// Restore factory defaults (persists and restarts)
    FactoryReset,
}

/// Command parse failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// Prefix not part of the command set
    Unknown,
    /// Known prefix, but the argument is not a finite number
    InvalidValue,
}

impl Command {
    /// Parse one command line
    ///
    /// Surrounding whitespace (including the line terminator) is ignored.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();

        match line {
            "t" => return Ok(Command::PrintTunings),
            "s" => return Ok(Command::SaveTunings),
            "r" => return Ok(Command::FactoryReset),
            _ => {}
        }

        if line.len() < 2 || !line.is_char_boundary(2) {
            return Err(CommandError::Unknown);
        }
        let (prefix, argument) = line.split_at(2);

        match prefix {
            "p:" => parse_value(argument).map(|v| Command::SetGain(Gain::P, v)),
            "i:" => parse_value(argument).map(|v| Command::SetGain(Gain::I, v)),
            "d:" => parse_value(argument).map(|v| Command::SetGain(Gain::D, v)),
            "t:" => parse_value(argument).map(Command::SetSetpoint),
            _ => Err(CommandError::Unknown),
        }
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::parse(s)
    }
}

fn parse_value(argument: &str) -> Result<f32, CommandError> {
    let value: f32 = argument
        .trim()
        .parse()
        .map_err(|_| CommandError::InvalidValue)?;

    if value.is_finite() {
        Ok(value)
    } else {
        Err(CommandError::InvalidValue)
    }
}

/// Line framing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// Line exceeded [`MAX_LINE_LEN`]; the rest of it is discarded
    TooLong,
    /// Non-ASCII byte received; the rest of the line is discarded
    InvalidByte,
}

/// Splits a serial byte stream into command lines
///
/// Lines end at `\n` or `\r`; empty lines are skipped. After an error the
/// parser drops bytes until the next terminator so a damaged line is never
/// executed partially.
#[derive(Debug, Clone, Default)]
pub struct LineParser {
    buffer: String<MAX_LINE_LEN>,
    discarding: bool,
}

impl LineParser {
    /// Create a new line parser
    pub const fn new() -> Self {
        Self {
            buffer: String::new(),
            discarding: false,
        }
    }

    /// Feed a single byte
    ///
    /// Returns `Ok(Some(line))` when a complete line is available.
    pub fn feed(&mut self, byte: u8) -> Result<Option<String<MAX_LINE_LEN>>, LineError> {
        if byte == b'\n' || byte == b'\r' {
            let line = core::mem::take(&mut self.buffer);
            let was_discarding = core::mem::replace(&mut self.discarding, false);
            if was_discarding || line.is_empty() {
                return Ok(None);
            }
            return Ok(Some(line));
        }

        if self.discarding {
            return Ok(None);
        }

        if !byte.is_ascii() {
            self.buffer.clear();
            self.discarding = true;
            return Err(LineError::InvalidByte);
        }

        if self.buffer.push(byte as char).is_err() {
            self.buffer.clear();
            self.discarding = true;
            return Err(LineError::TooLong);
        }

        Ok(None)
    }

    /// Drop any partially received line
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.discarding = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_all(parser: &mut LineParser, bytes: &[u8]) -> Option<String<MAX_LINE_LEN>> {
        let mut last = None;
        for &b in bytes {
            if let Ok(Some(line)) = parser.feed(b) {
                last = Some(line);
            }
        }
        last
    }

    #[test]
    fn test_gain_commands() {
        assert_eq!(Command::parse("p:4.5"), Ok(Command::SetGain(Gain::P, 4.5)));
        assert_eq!(Command::parse("i:0.25"), Ok(Command::SetGain(Gain::I, 0.25)));
        assert_eq!(Command::parse("d:1.8\r\n"), Ok(Command::SetGain(Gain::D, 1.8)));
    }

    #[test]
    fn test_bare_commands() {
        assert_eq!(Command::parse("t"), Ok(Command::PrintTunings));
        assert_eq!(Command::parse("s\n"), Ok(Command::SaveTunings));
        assert_eq!(Command::parse(" r "), Ok(Command::FactoryReset));
    }

    #[test]
    fn test_setpoint_command() {
        assert_eq!(Command::parse("t:320"), Ok(Command::SetSetpoint(320.0)));
        assert_eq!(Command::parse("t: 280.5"), Ok(Command::SetSetpoint(280.5)));
    }

    #[test]
    fn test_unknown_commands() {
        assert_eq!(Command::parse("x:1"), Err(CommandError::Unknown));
        assert_eq!(Command::parse("save"), Err(CommandError::Unknown));
        assert_eq!(Command::parse(""), Err(CommandError::Unknown));
        assert_eq!(Command::parse("é:1"), Err(CommandError::Unknown));
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(Command::parse("p:abc"), Err(CommandError::InvalidValue));
        assert_eq!(Command::parse("t:"), Err(CommandError::InvalidValue));
        assert_eq!(Command::parse("d:inf"), Err(CommandError::InvalidValue));
        assert_eq!(Command::parse("i:NaN"), Err(CommandError::InvalidValue));
    }

    #[test]
    fn test_from_str() {
        let cmd: Command = "p:2".parse().unwrap();
        assert_eq!(cmd, Command::SetGain(Gain::P, 2.0));
    }

    #[test]
    fn test_line_parser_splits_lines() {
        let mut parser = LineParser::new();
        let line = feed_all(&mut parser, b"p:4.5\n").unwrap();
        assert_eq!(line.as_str(), "p:4.5");

        // CRLF yields one line, the trailing LF is an empty line
        let line = feed_all(&mut parser, b"t\r\n").unwrap();
        assert_eq!(line.as_str(), "t");
    }

    #[test]
    fn test_line_parser_skips_empty_lines() {
        let mut parser = LineParser::new();
        assert_eq!(feed_all(&mut parser, b"\n\r\n"), None);
    }

    #[test]
    fn test_line_parser_discards_long_line() {
        let mut parser = LineParser::new();
        let mut result = Ok(None);
        for _ in 0..=MAX_LINE_LEN {
            result = parser.feed(b'1');
        }
        assert_eq!(result, Err(LineError::TooLong));

        // Tail of the long line is dropped, next line parses normally
        assert_eq!(feed_all(&mut parser, b"234\n"), None);
        assert_eq!(feed_all(&mut parser, b"s\n").unwrap().as_str(), "s");
    }

    #[test]
    fn test_line_parser_rejects_non_ascii() {
        let mut parser = LineParser::new();
        assert_eq!(parser.feed(b'p'), Ok(None));
        assert_eq!(parser.feed(0xC3), Err(LineError::InvalidByte));
        assert_eq!(feed_all(&mut parser, b":1\n"), None);
    }
}
