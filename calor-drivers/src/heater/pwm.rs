//! PWM heater output
//!
//! Drives the heater MOSFET with a hardware PWM channel. The 8-bit heater
//! command maps linearly onto the channel's duty range.

use calor_core::traits::HeaterOutput;
use embedded_hal::pwm::SetDutyCycle;

/// PWM heater output
///
/// The channel can be configured as active-high (default) or active-low.
pub struct PwmHeater<P> {
    pwm: P,
    /// If true, heater ON = pin LOW
    inverted: bool,
    /// Last command written
    command: u8,
    /// Set when the channel rejected a duty cycle
    faulted: bool,
}

impl<P: SetDutyCycle> PwmHeater<P> {
    /// Create a new PWM heater output, starting switched off
    ///
    /// # Arguments
    /// - `pwm`: The PWM channel driving the heater switch
    /// - `inverted`: If true, heater is ON when the pin is LOW
    pub fn new(pwm: P, inverted: bool) -> Self {
        let mut heater = Self {
            pwm,
            inverted,
            command: 0,
            faulted: false,
        };
        heater.write(0);
        heater
    }

    /// Create a new PWM heater with active-high output
    pub fn new_active_high(pwm: P) -> Self {
        Self::new(pwm, false)
    }

    /// Last command written
    pub fn command(&self) -> u8 {
        self.command
    }

    /// True if the PWM channel ever rejected a duty cycle
    pub fn is_faulted(&self) -> bool {
        self.faulted
    }
}

impl<P: SetDutyCycle> HeaterOutput for PwmHeater<P> {
    fn write(&mut self, command: u8) {
        self.command = command;

        let level = if self.inverted {
            u8::MAX - command
        } else {
            command
        };

        if self
            .pwm
            .set_duty_cycle_fraction(level as u16, u8::MAX as u16)
            .is_err()
        {
            #[cfg(feature = "defmt")]
            if !self.faulted {
                defmt::error!("Heater PWM rejected duty {}", level);
            }
            self.faulted = true;
        }
    }
}
