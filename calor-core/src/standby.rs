//! Standby automaton
//!
//! After a period without user input the setpoint drops to the standby
//! temperature. The previous setpoint is kept inside the state and
//! restored on wake. Waking happens on an explicit click, or on its own
//! when the tip cools by more than [`AUTO_WAKE_DELTA`] degrees within one
//! sample window (the tip was put into use).

use crate::config::{AUTO_WAKE_DELTA, TEMPERATURE_SAMPLE_MS};
use crate::control::ControlLoop;

/// Standby states
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StandbyState {
    /// Regulating to the user setpoint
    Active,
    /// Regulating to the standby temperature
    Standby {
        /// Setpoint to restore on wake
        saved_setpoint: f32,
    },
}

/// Events driving the standby automaton
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StandbyEvent {
    /// No user input for the configured timeout
    InactivityTimeout {
        /// Setpoint in effect when the timeout fired
        setpoint: f32,
    },
    /// Button clicked while in standby
    WakeClick,
    /// Temperature dropped sharply while in standby
    HeatLoss,
}

impl StandbyState {
    pub fn is_standby(&self) -> bool {
        matches!(self, StandbyState::Standby { .. })
    }

    /// Setpoint to restore, only present while in standby
    pub fn saved_setpoint(&self) -> Option<f32> {
        match self {
            StandbyState::Standby { saved_setpoint } => Some(*saved_setpoint),
            StandbyState::Active => None,
        }
    }

    /// Process an event and return the next state
    pub fn transition(self, event: StandbyEvent) -> Self {
        use StandbyEvent::*;
        use StandbyState::*;

        match (self, event) {
            (Active, InactivityTimeout { setpoint }) => Standby {
                saved_setpoint: setpoint,
            },
            (Standby { .. }, WakeClick | HeatLoss) => Active,
            (state, _) => state,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct TemperatureSample {
    at_ms: u32,
    temperature: f32,
}

/// Standby automaton with its timers
#[derive(Debug, Clone)]
pub struct Standby {
    state: StandbyState,
    last_activity_ms: u32,
    sample: Option<TemperatureSample>,
    absorbed: i32,
}

impl Standby {
    pub fn new(now_ms: u32) -> Self {
        Self {
            state: StandbyState::Active,
            last_activity_ms: now_ms,
            sample: None,
            absorbed: 0,
        }
    }

    pub fn state(&self) -> StandbyState {
        self.state
    }

    pub fn is_standby(&self) -> bool {
        self.state.is_standby()
    }

    /// Restart the inactivity timer
    pub fn note_activity(&mut self, now_ms: u32) {
        self.last_activity_ms = now_ms;
    }

    /// Enter standby once the inactivity timeout has strictly elapsed
    ///
    /// The current setpoint is saved and the standby temperature applied.
    pub fn check_timeout(
        &mut self,
        now_ms: u32,
        timeout_s: u16,
        standby_temperature: f32,
        control: &mut ControlLoop,
    ) -> bool {
        if self.is_standby() {
            return false;
        }
        if now_ms.wrapping_sub(self.last_activity_ms) <= timeout_s as u32 * 1000 {
            return false;
        }

        self.state = self.state.transition(StandbyEvent::InactivityTimeout {
            setpoint: control.setpoint(),
        });
        control.override_setpoint(standby_temperature);
        self.absorbed = 0;

        #[cfg(feature = "defmt")]
        defmt::info!("Entering standby at {} C", standby_temperature);

        true
    }

    /// Explicit wake by button click
    pub fn click(&mut self, now_ms: u32, control: &mut ControlLoop) -> bool {
        self.wake(now_ms, StandbyEvent::WakeClick, control)
    }

    /// Feed a corrected measurement to the heat-loss detector
    ///
    /// A sample is taken once more than one window has passed since the
    /// previous one. Returns true if this sample woke the station.
    pub fn sample(&mut self, now_ms: u32, measured: f32, control: &mut ControlLoop) -> bool {
        let current = TemperatureSample {
            at_ms: now_ms,
            temperature: measured,
        };

        let Some(previous) = self.sample else {
            self.sample = Some(current);
            return false;
        };
        if now_ms.wrapping_sub(previous.at_ms) <= TEMPERATURE_SAMPLE_MS {
            return false;
        }

        self.sample = Some(current);
        let delta = measured - previous.temperature;

        if self.is_standby() && delta < AUTO_WAKE_DELTA {
            #[cfg(feature = "defmt")]
            defmt::info!("Heat loss of {} C, waking", delta);

            return self.wake(now_ms, StandbyEvent::HeatLoss, control);
        }
        false
    }

    /// Record encoder movement received while in standby
    ///
    /// Rotation never changes anything in standby; it is only counted.
    pub fn absorb(&mut self, delta: i16) {
        self.absorbed = self.absorbed.saturating_add(delta as i32);
    }

    /// Detents absorbed since standby was entered
    pub fn absorbed(&self) -> i32 {
        self.absorbed
    }

    fn wake(&mut self, now_ms: u32, event: StandbyEvent, control: &mut ControlLoop) -> bool {
        let Some(saved_setpoint) = self.state.saved_setpoint() else {
            return false;
        };

        self.state = self.state.transition(event);
        control.set_setpoint(saved_setpoint);
        self.last_activity_ms = now_ms;
        true
    }
}
