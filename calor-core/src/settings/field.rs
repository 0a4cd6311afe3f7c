//! Editable settings fields and their step/range table

use calor_protocol::Gain;

/// A settings field that can be edited from the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Field {
    StandbyTimeout,
    StandbyTemperature,
    AutoOffTimeout,
    PidP,
    PidI,
    PidD,
    TempCorrection,
    MaxPower,
}

/// Step sizes and inclusive bounds of a field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    /// Change per detent
    pub step: f32,
    /// Change per detent while the button is held
    pub fast_step: f32,
    pub min: f32,
    pub max: f32,
}

impl FieldSpec {
    const fn new(step: f32, fast_step: f32, min: f32, max: f32) -> Self {
        Self {
            step,
            fast_step,
            min,
            max,
        }
    }

    /// Pull `value` into `[min, max]`
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }
}

impl From<Gain> for Field {
    fn from(gain: Gain) -> Self {
        match gain {
            Gain::P => Field::PidP,
            Gain::I => Field::PidI,
            Gain::D => Field::PidD,
        }
    }
}

impl Field {
    /// All editable fields
    pub const ALL: [Field; 8] = [
        Field::StandbyTimeout,
        Field::StandbyTemperature,
        Field::AutoOffTimeout,
        Field::PidP,
        Field::PidI,
        Field::PidD,
        Field::TempCorrection,
        Field::MaxPower,
    ];

    /// Step/range table entry
    pub const fn spec(self) -> FieldSpec {
        match self {
            Field::StandbyTimeout => FieldSpec::new(5.0, 5.0, 30.0, 300.0),
            Field::StandbyTemperature => FieldSpec::new(5.0, 10.0, 0.0, 250.0),
            Field::AutoOffTimeout => FieldSpec::new(10.0, 10.0, 10.0, 120.0),
            Field::PidP | Field::PidI | Field::PidD => FieldSpec::new(0.01, 1.0, 0.0, 30.0),
            Field::TempCorrection => FieldSpec::new(0.05, 0.05, 0.5, 1.5),
            Field::MaxPower => FieldSpec::new(2.0, 2.0, 50.0, 255.0),
        }
    }

    /// Returns true if the running control loop must follow edits of this field
    pub const fn affects_control(self) -> bool {
        matches!(
            self,
            Field::PidP | Field::PidI | Field::PidD | Field::MaxPower
        )
    }
}
