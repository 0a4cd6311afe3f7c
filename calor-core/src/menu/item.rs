//! Settings menu items

use crate::settings::Field;

/// Entries of the settings menu, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuItem {
    Exit,
    StandbyTime,
    StandbyTemperature,
    PowerOff,
    PidP,
    PidI,
    PidD,
    TempCorrection,
    MaxPower,
    SaveAll,
    ResetAll,
}

/// What clicking an action item does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuAction {
    /// Leave the menu by restarting (unsaved edits are lost)
    Restart,
    /// Persist everything, then restart
    SaveAndRestart,
    /// Restore and persist defaults, then restart
    FactoryReset,
}

impl MenuItem {
    pub const ALL: [MenuItem; 11] = [
        MenuItem::Exit,
        MenuItem::StandbyTime,
        MenuItem::StandbyTemperature,
        MenuItem::PowerOff,
        MenuItem::PidP,
        MenuItem::PidI,
        MenuItem::PidD,
        MenuItem::TempCorrection,
        MenuItem::MaxPower,
        MenuItem::SaveAll,
        MenuItem::ResetAll,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Neighbouring item in `direction` (sign only), clamped to the list
    pub fn step(self, direction: i8) -> Self {
        let last = Self::ALL.len() as isize - 1;
        let index = (self.index() as isize + direction.signum() as isize).clamp(0, last);
        Self::ALL[index as usize]
    }

    pub fn title(self) -> &'static str {
        match self {
            MenuItem::Exit => "EXIT",
            MenuItem::StandbyTime => "STDBY TIME",
            MenuItem::StandbyTemperature => "STDBY TEMP",
            MenuItem::PowerOff => "POWER OFF",
            MenuItem::PidP => "PID: P",
            MenuItem::PidI => "PID: I",
            MenuItem::PidD => "PID: D",
            MenuItem::TempCorrection => "TEMP CORR",
            MenuItem::MaxPower => "MAX POWER",
            MenuItem::SaveAll => "SAVE ALL",
            MenuItem::ResetAll => "RESET ALL",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            MenuItem::Exit => "REBOOT",
            MenuItem::StandbyTime => "SECONDS",
            MenuItem::StandbyTemperature => "CELSIUS",
            MenuItem::PowerOff => "MINUTES",
            MenuItem::PidP => "P",
            MenuItem::PidI => "I",
            MenuItem::PidD => "D",
            MenuItem::TempCorrection => "FACTOR",
            MenuItem::MaxPower => "%",
            MenuItem::SaveAll => "EEPROM",
            MenuItem::ResetAll => "DEFAULTS",
        }
    }

    /// Settings field edited by this item
    pub fn field(self) -> Option<Field> {
        match self {
            MenuItem::StandbyTime => Some(Field::StandbyTimeout),
            MenuItem::StandbyTemperature => Some(Field::StandbyTemperature),
            MenuItem::PowerOff => Some(Field::AutoOffTimeout),
            MenuItem::PidP => Some(Field::PidP),
            MenuItem::PidI => Some(Field::PidI),
            MenuItem::PidD => Some(Field::PidD),
            MenuItem::TempCorrection => Some(Field::TempCorrection),
            MenuItem::MaxPower => Some(Field::MaxPower),
            MenuItem::Exit | MenuItem::SaveAll | MenuItem::ResetAll => None,
        }
    }

    /// Action triggered by clicking this item
    pub fn action(self) -> Option<MenuAction> {
        match self {
            MenuItem::Exit => Some(MenuAction::Restart),
            MenuItem::SaveAll => Some(MenuAction::SaveAndRestart),
            MenuItem::ResetAll => Some(MenuAction::FactoryReset),
            _ => None,
        }
    }
}
