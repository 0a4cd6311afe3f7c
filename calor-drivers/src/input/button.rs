//! Push-button classification
//!
//! The button level is sampled at a fixed interval. A press that is
//! released quickly becomes a click once the double-click window has
//! passed without a second press; a second press inside the window
//! becomes a double-click instead. Holding past the hold time reports
//! `Held` until release, which reports `Released`.

use calor_protocol::ButtonEvent;

/// Button timing parameters (ms)
#[derive(Debug, Clone, Copy)]
pub struct ButtonTiming {
    /// Sampling interval
    pub interval_ms: u32,
    /// Window for the second press of a double-click
    pub double_click_ms: u32,
    /// Press duration before `Held` is reported
    pub hold_ms: u32,
}

impl Default for ButtonTiming {
    fn default() -> Self {
        Self {
            interval_ms: 10,
            double_click_ms: 600,
            hold_ms: 1200,
        }
    }
}

impl ButtonTiming {
    fn ticks(&self, ms: u32) -> u32 {
        ms / self.interval_ms.max(1)
    }
}

/// Click / double-click / hold classifier
#[derive(Debug, Clone)]
pub struct ButtonClassifier {
    timing: ButtonTiming,
    down_ticks: u32,
    /// Countdown until a pending click is reported
    click_ticks: u32,
    held: bool,
    event: Option<ButtonEvent>,
}

impl ButtonClassifier {
    pub fn new(timing: ButtonTiming) -> Self {
        Self {
            timing,
            down_ticks: 0,
            click_ticks: 0,
            held: false,
            event: None,
        }
    }

    pub fn timing(&self) -> ButtonTiming {
        self.timing
    }

    /// Feed one sample; call once per sampling interval
    pub fn sample(&mut self, pressed: bool) {
        if pressed {
            self.down_ticks = self.down_ticks.saturating_add(1);
            if self.down_ticks > self.timing.ticks(self.timing.hold_ms) {
                self.held = true;
                self.click_ticks = 0;
                self.event = Some(ButtonEvent::Held);
            }
        } else {
            if self.down_ticks > 0 {
                if self.held {
                    self.held = false;
                    self.event = Some(ButtonEvent::Released);
                } else if self.click_ticks > 0 {
                    self.click_ticks = 0;
                    self.event = Some(ButtonEvent::DoubleClicked);
                } else {
                    self.click_ticks = self.timing.ticks(self.timing.double_click_ms);
                }
            }
            self.down_ticks = 0;
        }

        if self.click_ticks > 0 {
            self.click_ticks -= 1;
            if self.click_ticks == 0 {
                self.event = Some(ButtonEvent::Clicked);
            }
        }
    }

    /// Take the latest event
    ///
    /// `Held` stays reported until the button is released.
    pub fn take(&mut self) -> Option<ButtonEvent> {
        let event = self.event;
        if event != Some(ButtonEvent::Held) {
            self.event = None;
        }
        event
    }
}

impl Default for ButtonClassifier {
    fn default() -> Self {
        Self::new(ButtonTiming::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(classifier: &mut ButtonClassifier, pressed: bool, samples: u32) {
        for _ in 0..samples {
            classifier.sample(pressed);
        }
    }

    /// Collect events over `samples` idle samples
    fn drain(classifier: &mut ButtonClassifier, samples: u32) -> (u32, Option<ButtonEvent>) {
        let mut count = 0;
        let mut last = None;
        for _ in 0..samples {
            classifier.sample(false);
            if let Some(event) = classifier.take() {
                count += 1;
                last = Some(event);
            }
        }
        (count, last)
    }

    #[test]
    fn test_single_click() {
        let mut c = ButtonClassifier::default();
        run(&mut c, true, 5);
        c.sample(false);
        // Not reported before the double-click window closes
        assert_eq!(c.take(), None);

        assert_eq!(drain(&mut c, 100), (1, Some(ButtonEvent::Clicked)));
    }

    #[test]
    fn test_click_waits_for_window() {
        let mut c = ButtonClassifier::default();
        run(&mut c, true, 5);
        run(&mut c, false, 59);
        assert_eq!(c.take(), None);
        run(&mut c, false, 1);
        assert_eq!(c.take(), Some(ButtonEvent::Clicked));
    }

    #[test]
    fn test_double_click() {
        let mut c = ButtonClassifier::default();
        run(&mut c, true, 5);
        run(&mut c, false, 10);
        run(&mut c, true, 5);
        c.sample(false);
        assert_eq!(c.take(), Some(ButtonEvent::DoubleClicked));

        // No trailing single click
        assert_eq!(drain(&mut c, 100), (0, None));
    }

    #[test]
    fn test_hold_and_release() {
        let mut c = ButtonClassifier::default();
        run(&mut c, true, 120);
        assert_eq!(c.take(), None);

        c.sample(true);
        assert_eq!(c.take(), Some(ButtonEvent::Held));
        // Sticky while held
        assert_eq!(c.take(), Some(ButtonEvent::Held));

        c.sample(false);
        assert_eq!(c.take(), Some(ButtonEvent::Released));
        assert_eq!(drain(&mut c, 100), (0, None));
    }
}
