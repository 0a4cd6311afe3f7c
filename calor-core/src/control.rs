//! PID heater control loop
//!
//! Fixed-sample-time PID with derivative on measurement. The integral
//! term and the output are both clamped to `[0, ceiling]`, where the
//! ceiling is the user's maximum power limit. The first call after
//! construction computes immediately; later calls only recompute once a
//! full sample period has elapsed and otherwise return the held command.

use calor_protocol::Gain;

use crate::config::{MAX_SAFE_TEMPERATURE, MAX_SETPOINT, MIN_SETPOINT, PID_SAMPLE_TIME_MS};

/// PID gains
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PidGains {
    /// Proportional gain (Kp)
    pub p: f32,
    /// Integral gain (Ki, per second)
    pub i: f32,
    /// Derivative gain (Kd, seconds)
    pub d: f32,
}

impl PidGains {
    pub const fn new(p: f32, i: f32, d: f32) -> Self {
        Self { p, i, d }
    }

    pub fn get(&self, gain: Gain) -> f32 {
        match gain {
            Gain::P => self.p,
            Gain::I => self.i,
            Gain::D => self.d,
        }
    }

    /// Copy with one gain replaced
    pub fn with(mut self, gain: Gain, value: f32) -> Self {
        match gain {
            Gain::P => self.p = value,
            Gain::I => self.i = value,
            Gain::D => self.d = value,
        }
        self
    }

    /// Gains are usable if none is negative or non-finite
    pub fn is_valid(&self) -> bool {
        [self.p, self.i, self.d]
            .iter()
            .all(|g| g.is_finite() && *g >= 0.0)
    }
}

/// Control loop configuration
#[derive(Debug, Clone, Copy)]
pub struct ControlConfig {
    /// Recompute period (ms)
    pub sample_time_ms: u32,
    /// Measured temperature at which the output is forced to zero
    pub max_temperature: f32,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            sample_time_ms: PID_SAMPLE_TIME_MS,
            max_temperature: MAX_SAFE_TEMPERATURE,
        }
    }
}

/// The temperature control loop
#[derive(Debug, Clone)]
pub struct ControlLoop {
    config: ControlConfig,
    gains: PidGains,
    setpoint: f32,
    ceiling: u8,
    integral: f32,
    output: f32,
    last_input: Option<f32>,
    last_compute_ms: Option<u32>,
}

impl ControlLoop {
    /// Create a control loop
    ///
    /// The setpoint is clamped like [`ControlLoop::set_setpoint`]. Invalid
    /// gains fall back to zero.
    pub fn new(config: ControlConfig, gains: PidGains, ceiling: u8, setpoint: f32) -> Self {
        let mut control = Self {
            config,
            gains: PidGains::default(),
            setpoint: MIN_SETPOINT,
            ceiling,
            integral: 0.0,
            output: 0.0,
            last_input: None,
            last_compute_ms: None,
        };
        control.set_tunings(gains);
        control.set_setpoint(setpoint);
        control
    }

    /// Current target temperature
    pub fn setpoint(&self) -> f32 {
        self.setpoint
    }

    /// Set the target temperature, clamped to the user range
    pub fn set_setpoint(&mut self, setpoint: f32) {
        self.setpoint = setpoint.clamp(MIN_SETPOINT, MAX_SETPOINT);
    }

    /// Set the target temperature bypassing the user range
    ///
    /// Used for the standby temperature, which may sit below the user
    /// minimum. Still bounded to `[0, MAX_SETPOINT]`.
    pub fn override_setpoint(&mut self, setpoint: f32) {
        self.setpoint = setpoint.clamp(0.0, MAX_SETPOINT);
    }

    /// Current gains
    pub fn gains(&self) -> PidGains {
        self.gains
    }

    /// Replace the gains
    ///
    /// Returns false (and keeps the old gains) if any gain is negative or
    /// not finite.
    pub fn set_tunings(&mut self, gains: PidGains) -> bool {
        if !gains.is_valid() {
            return false;
        }
        self.gains = gains;
        true
    }

    /// Heater command ceiling
    pub fn ceiling(&self) -> u8 {
        self.ceiling
    }

    /// Change the heater command ceiling
    ///
    /// The held output and the integral term are clamped immediately.
    pub fn set_ceiling(&mut self, ceiling: u8) {
        self.ceiling = ceiling;
        let limit = ceiling as f32;
        self.integral = self.integral.clamp(0.0, limit);
        self.output = self.output.clamp(0.0, limit);
    }

    /// Most recent heater command
    pub fn command(&self) -> u8 {
        self.output as u8
    }

    /// Most recent command as a percentage of the ceiling
    pub fn actuator_percent(&self) -> f32 {
        if self.ceiling == 0 {
            return 0.0;
        }
        self.output / self.ceiling as f32 * 100.0
    }

    /// Run one loop iteration with a corrected measurement
    ///
    /// Returns the heater command in `[0, ceiling]`. At or above the safe
    /// temperature the command is zero regardless of the PID state.
    pub fn tick(&mut self, now_ms: u32, measured: f32) -> u8 {
        if measured >= self.config.max_temperature {
            #[cfg(feature = "defmt")]
            defmt::warn!("Over-temperature: {} C, heater off", measured);

            self.output = 0.0;
            self.last_input = Some(measured);
            self.last_compute_ms = Some(now_ms);
            return 0;
        }

        if let Some(last) = self.last_compute_ms {
            if now_ms.wrapping_sub(last) < self.config.sample_time_ms {
                return self.command();
            }
        }

        self.compute(measured);
        self.last_compute_ms = Some(now_ms);
        self.command()
    }

    /// Sensor fault: zero output and drop the derivative history
    pub fn fault(&mut self) -> u8 {
        self.output = 0.0;
        self.last_input = None;
        0
    }

    fn compute(&mut self, input: f32) {
        let dt_s = self.config.sample_time_ms as f32 / 1000.0;
        let limit = self.ceiling as f32;

        let error = self.setpoint - input;
        let d_input = input - self.last_input.unwrap_or(input);

        self.integral = (self.integral + self.gains.i * dt_s * error).clamp(0.0, limit);

        let output = self.gains.p * error + self.integral - self.gains.d / dt_s * d_input;
        self.output = output.clamp(0.0, limit);
        self.last_input = Some(input);
    }
}
