//! Controlled restart requests
//!
//! The core never resets the chip itself. It records why and when a
//! restart should happen and the firmware performs it once due.

/// Why a restart was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RestartReason {
    /// Settings menu left via EXIT
    MenuExit,
    /// Settings saved from the menu
    SettingsSaved,
    /// Factory defaults restored (menu, serial, or rejected record at boot)
    FactoryReset,
}

impl RestartReason {
    /// Delay between the request and the restart (ms)
    pub const fn delay_ms(self) -> u32 {
        match self {
            RestartReason::MenuExit => 15,
            RestartReason::SettingsSaved => 100,
            RestartReason::FactoryReset => 500,
        }
    }
}

/// A scheduled restart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PendingRestart {
    pub reason: RestartReason,
    pub requested_ms: u32,
}

impl PendingRestart {
    pub fn new(reason: RestartReason, now_ms: u32) -> Self {
        Self {
            reason,
            requested_ms: now_ms,
        }
    }

    pub fn is_due(&self, now_ms: u32) -> bool {
        now_ms.wrapping_sub(self.requested_ms) >= self.reason.delay_ms()
    }
}
