//! Periodic telemetry line
//!
//! One space-separated line, suitable for serial plotters:
//!
//! ```text
//! setpoint measured actuator% P I D standby standbyTemp standbyTimeout
//! ```

use core::fmt::{self, Write};

use heapless::String;

/// Longest telemetry line (excluding the terminator)
pub const MAX_TELEMETRY_LEN: usize = 96;

/// A formatted telemetry line
pub type TelemetryLine = String<MAX_TELEMETRY_LEN>;

/// Snapshot of the values reported on the telemetry line
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Telemetry {
    /// Target temperature
    pub setpoint: f32,
    /// Corrected measured temperature
    pub measured: f32,
    /// Actuator command as a percentage of the power ceiling
    pub actuator_percent: f32,
    /// Proportional gain
    pub p: f32,
    /// Integral gain
    pub i: f32,
    /// Derivative gain
    pub d: f32,
    /// True while in standby
    pub standby: bool,
    /// Standby temperature
    pub standby_temperature: f32,
    /// Standby timeout in seconds
    pub standby_timeout_s: u16,
}

impl fmt::Display for Telemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} {} {:.2} {}",
            self.setpoint,
            self.measured,
            self.actuator_percent,
            self.p,
            self.i,
            self.d,
            self.standby as u8,
            self.standby_temperature,
            self.standby_timeout_s,
        )
    }
}

impl Telemetry {
    /// Format the telemetry into a fixed-capacity line
    pub fn to_line(&self) -> TelemetryLine {
        let mut line = TelemetryLine::new();
        let _ = write!(line, "{}", self);
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_telemetry_line() {
        let telemetry = Telemetry {
            setpoint: 300.0,
            measured: 298.75,
            actuator_percent: 12.5,
            p: 4.0,
            i: 0.0,
            d: 1.8,
            standby: false,
            standby_temperature: 150.0,
            standby_timeout_s: 60,
        };

        assert_eq!(
            telemetry.to_line().as_str(),
            "300.00 298.75 12.50 4.00 0.00 1.80 0 150.00 60"
        );
    }

    #[test]
    fn test_standby_flag() {
        let telemetry = Telemetry {
            setpoint: 150.0,
            measured: 151.0,
            actuator_percent: 0.0,
            p: 4.0,
            i: 0.0,
            d: 1.8,
            standby: true,
            standby_temperature: 150.0,
            standby_timeout_s: 30,
        };

        let line = telemetry.to_line();
        assert_eq!(line.split(' ').nth(6), Some("1"));
        assert_eq!(line.split(' ').count(), 9);
    }
}
