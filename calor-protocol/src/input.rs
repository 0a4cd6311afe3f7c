//! Input events from the rotary encoder
//!
//! The encoder is serviced independently of the main loop; once per loop
//! iteration the main loop takes an [`InputSnapshot`] holding everything
//! that happened since the previous poll.

/// Button events reported by the encoder push-button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    /// Single short press
    Clicked,
    /// Two short presses within the double-click window
    DoubleClicked,
    /// Button is being held (reported repeatedly while held)
    Held,
    /// Button released after being held
    Released,
}

/// Everything the encoder reported since the previous poll
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputSnapshot {
    /// Signed detent count (positive = clockwise)
    pub delta: i16,
    /// Latest button event, if any
    pub button: Option<ButtonEvent>,
}

impl InputSnapshot {
    /// Snapshot with no rotation and no button event
    pub const IDLE: Self = Self {
        delta: 0,
        button: None,
    };

    /// Snapshot with rotation only
    pub const fn rotate(delta: i16) -> Self {
        Self {
            delta,
            button: None,
        }
    }

    /// Snapshot with a button event only
    pub const fn button(event: ButtonEvent) -> Self {
        Self {
            delta: 0,
            button: Some(event),
        }
    }

    /// Returns true if the encoder was rotated
    pub fn is_rotation(&self) -> bool {
        self.delta != 0
    }

    /// Returns true if anything happened at all
    pub fn has_activity(&self) -> bool {
        self.is_rotation() || self.button.is_some()
    }

    /// Returns the rotation direction (-1, 0, or +1)
    pub fn direction(&self) -> i8 {
        self.delta.signum() as i8
    }

    /// Returns true if the snapshot carries the given button event
    pub fn is(&self, event: ButtonEvent) -> bool {
        self.button == Some(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_has_no_activity() {
        assert!(!InputSnapshot::IDLE.has_activity());
        assert!(!InputSnapshot::default().has_activity());
    }

    #[test]
    fn test_direction() {
        assert_eq!(InputSnapshot::rotate(7).direction(), 1);
        assert_eq!(InputSnapshot::rotate(-3).direction(), -1);
        assert_eq!(InputSnapshot::IDLE.direction(), 0);
    }

    #[test]
    fn test_button_activity() {
        let snapshot = InputSnapshot::button(ButtonEvent::Held);
        assert!(snapshot.has_activity());
        assert!(!snapshot.is_rotation());
        assert!(snapshot.is(ButtonEvent::Held));
        assert!(!snapshot.is(ButtonEvent::Clicked));
    }
}
