//! Persisted user settings
//!
//! A single fixed-layout record holds everything the user can change:
//! standby behavior, PID gains, the three memory presets, the sensor
//! correction factor and the heater power ceiling.
//!
//! The record is only trusted when its init marker and checksum match;
//! anything else is replaced by [`Settings::factory_defaults`].

mod field;
pub mod record;
mod store;

pub use field::{Field, FieldSpec};
pub use record::{RecordError, RECORD_LEN};
pub use store::{LoadError, Loaded, PersistError, RamStorage, SettingsStore};

use serde::{Deserialize, Serialize};

use crate::config::{MAX_SETPOINT, MIN_SETPOINT};
use crate::control::PidGains;
use crate::memory::MemorySlot;

/// Marker stored in the first byte of an initialized record
pub const INIT_MARKER: u8 = 123;

/// The persisted settings record
///
/// Field order is the on-flash layout. Integer fields use fixed-width
/// encoding so the record always serializes to the same length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Settings {
    /// Must equal [`INIT_MARKER`] for the record to be trusted
    pub init_marker: u8,
    /// Setpoint applied while in standby (degrees)
    pub standby_temperature: f32,
    /// Inactivity before entering standby (seconds)
    #[serde(with = "postcard::fixint::le")]
    pub standby_timeout_s: u16,
    /// Proportional gain
    pub pid_p: f32,
    /// Integral gain
    pub pid_i: f32,
    /// Derivative gain
    pub pid_d: f32,
    /// Preset temperatures, indexed by [`MemorySlot::index`]
    pub memory: [f32; 3],
    /// Multiplier applied to raw sensor readings
    pub temp_correction_factor: f32,
    /// Heater command ceiling (0-255)
    pub max_power_limit: u8,
    /// Auto power-off timeout (minutes)
    #[serde(with = "postcard::fixint::le")]
    pub auto_off_timeout_min: u16,
    /// Preset that provides the boot setpoint
    pub last_selected_memory: MemorySlot,
}

impl Settings {
    /// Factory default settings
    pub const fn factory_defaults() -> Self {
        Self {
            init_marker: INIT_MARKER,
            standby_temperature: 150.0,
            standby_timeout_s: 60,
            pid_p: 4.0,
            pid_i: 0.0,
            pid_d: 1.8,
            memory: [300.0, 260.0, 350.0],
            temp_correction_factor: 0.85,
            max_power_limit: 220,
            auto_off_timeout_min: 30,
            last_selected_memory: MemorySlot::One,
        }
    }

    /// Check the init marker
    pub fn is_initialized(&self) -> bool {
        self.init_marker == INIT_MARKER
    }

    /// Check that every field lies within its editable range
    pub fn is_within_limits(&self) -> bool {
        let fields_ok = Field::ALL.iter().all(|&field| {
            let value = self.get(field);
            let spec = field.spec();
            value.is_finite() && value >= spec.min && value <= spec.max
        });
        let memory_ok = self
            .memory
            .iter()
            .all(|t| t.is_finite() && *t >= MIN_SETPOINT && *t <= MAX_SETPOINT);

        fields_ok && memory_ok
    }

    /// Preset temperature for a slot
    pub fn memory(&self, slot: MemorySlot) -> f32 {
        self.memory[slot.index()]
    }

    /// Overwrite a preset temperature
    pub fn set_memory(&mut self, slot: MemorySlot, temperature: f32) {
        self.memory[slot.index()] = temperature;
    }

    /// Persisted PID gains
    pub fn gains(&self) -> PidGains {
        PidGains::new(self.pid_p, self.pid_i, self.pid_d)
    }

    /// Store PID gains
    pub fn set_gains(&mut self, gains: PidGains) {
        self.pid_p = gains.p;
        self.pid_i = gains.i;
        self.pid_d = gains.d;
    }

    /// Read an editable field as a float
    pub fn get(&self, field: Field) -> f32 {
        match field {
            Field::StandbyTimeout => self.standby_timeout_s as f32,
            Field::StandbyTemperature => self.standby_temperature,
            Field::AutoOffTimeout => self.auto_off_timeout_min as f32,
            Field::PidP => self.pid_p,
            Field::PidI => self.pid_i,
            Field::PidD => self.pid_d,
            Field::TempCorrection => self.temp_correction_factor,
            Field::MaxPower => self.max_power_limit as f32,
        }
    }

    /// Step an editable field in `direction` (sign only), clamped to its range
    ///
    /// Returns the new value.
    pub fn adjust(&mut self, field: Field, direction: i8, fast: bool) -> f32 {
        let spec = field.spec();
        let step = if fast { spec.fast_step } else { spec.step };
        let value = spec.clamp(self.get(field) + step * direction.signum() as f32);

        match field {
            Field::StandbyTimeout => self.standby_timeout_s = value as u16,
            Field::StandbyTemperature => self.standby_temperature = value,
            Field::AutoOffTimeout => self.auto_off_timeout_min = value as u16,
            Field::PidP => self.pid_p = value,
            Field::PidI => self.pid_i = value,
            Field::PidD => self.pid_d = value,
            Field::TempCorrection => self.temp_correction_factor = value,
            Field::MaxPower => self.max_power_limit = value as u8,
        }

        value
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::factory_defaults()
    }
}
