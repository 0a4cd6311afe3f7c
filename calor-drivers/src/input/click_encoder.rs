//! Rotary encoder with push-button
//!
//! Reads the A/B phase pins and the active-low button pin through
//! `embedded-hal` input pins. [`ClickEncoder::service`] must run every
//! millisecond; it accumulates detents and samples the button at the
//! classifier's interval.

use calor_protocol::InputSnapshot;
use embedded_hal::digital::InputPin;

use super::button::{ButtonClassifier, ButtonTiming};
use super::quadrature::QuadratureDecoder;

/// Encoder plus button, serviced from a fast periodic task
pub struct ClickEncoder<A, B, BTN> {
    a: A,
    b: B,
    button: BTN,
    decoder: QuadratureDecoder,
    classifier: ButtonClassifier,
    delta: i16,
    last_button_ms: Option<u32>,
}

impl<A: InputPin, B: InputPin, BTN: InputPin> ClickEncoder<A, B, BTN> {
    /// Create an encoder from its pins
    ///
    /// Phase pins that cannot be read start as released (high).
    pub fn new(mut a: A, mut b: B, button: BTN, timing: ButtonTiming) -> Self {
        let level_a = a.is_high().unwrap_or(true);
        let level_b = b.is_high().unwrap_or(true);

        Self {
            a,
            b,
            button,
            decoder: QuadratureDecoder::new(level_a, level_b),
            classifier: ButtonClassifier::new(timing),
            delta: 0,
            last_button_ms: None,
        }
    }

    /// Sample the pins; call every millisecond
    ///
    /// Pin read errors skip the affected sample.
    pub fn service(&mut self, now_ms: u32) {
        if let (Ok(a), Ok(b)) = (self.a.is_high(), self.b.is_high()) {
            let step = self.decoder.update(a, b);
            self.delta = self.delta.saturating_add(step as i16);
        }

        let interval = self.classifier.timing().interval_ms;
        let due = self
            .last_button_ms
            .map_or(true, |last| now_ms.wrapping_sub(last) >= interval);
        if due {
            self.last_button_ms = Some(now_ms);
            if let Ok(pressed) = self.button.is_low() {
                self.classifier.sample(pressed);
            }
        }
    }

    /// Take everything reported since the previous snapshot
    pub fn take_snapshot(&mut self) -> InputSnapshot {
        InputSnapshot {
            delta: core::mem::take(&mut self.delta),
            button: self.classifier.take(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calor_protocol::ButtonEvent;
    use core::cell::Cell;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    /// Pin whose level is set through a shared cell
    struct MockPin<'a>(&'a Cell<bool>);

    impl ErrorType for MockPin<'_> {
        type Error = Infallible;
    }

    impl InputPin for MockPin<'_> {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            Ok(self.0.get())
        }

        fn is_low(&mut self) -> Result<bool, Infallible> {
            Ok(!self.0.get())
        }
    }

    struct Rig {
        a: Cell<bool>,
        b: Cell<bool>,
        btn: Cell<bool>,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                a: Cell::new(true),
                b: Cell::new(true),
                btn: Cell::new(true),
            }
        }

        fn encoder(&self) -> ClickEncoder<MockPin<'_>, MockPin<'_>, MockPin<'_>> {
            ClickEncoder::new(
                MockPin(&self.a),
                MockPin(&self.b),
                MockPin(&self.btn),
                ButtonTiming::default(),
            )
        }

        fn set(&self, a: bool, b: bool) {
            self.a.set(a);
            self.b.set(b);
        }
    }

    #[test]
    fn test_rotation_accumulates() {
        let rig = Rig::new();
        let mut encoder = rig.encoder();
        let mut now = 0;

        for _ in 0..3 {
            for (a, b) in [(false, true), (false, false), (true, false), (true, true)] {
                rig.set(a, b);
                encoder.service(now);
                now += 1;
            }
        }

        assert_eq!(encoder.take_snapshot(), InputSnapshot::rotate(3));
        assert_eq!(encoder.take_snapshot(), InputSnapshot::IDLE);
    }

    #[test]
    fn test_button_sampled_at_interval() {
        let rig = Rig::new();
        let mut encoder = rig.encoder();

        // 50 ms press serviced every millisecond
        rig.btn.set(false);
        for now in 0..50 {
            encoder.service(now);
        }
        rig.btn.set(true);
        for now in 50..1000 {
            encoder.service(now);
        }

        assert_eq!(
            encoder.take_snapshot(),
            InputSnapshot::button(ButtonEvent::Clicked)
        );
    }
}
