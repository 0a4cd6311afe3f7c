//! Quadrature decoding
//!
//! State machine decoder with noise rejection: a detent is only counted
//! after the full Idle -> Step1 -> Step2 -> Idle sequence.

/// Decoder state machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    CwStep1,
    CwStep2,
    CcwStep1,
    CcwStep2,
}

/// Quadrature state machine
#[derive(Debug, Clone)]
pub struct QuadratureDecoder {
    state: State,
    last: (bool, bool),
}

impl QuadratureDecoder {
    /// Create a decoder from the current pin levels
    pub fn new(a: bool, b: bool) -> Self {
        Self {
            state: State::Idle,
            last: (a, b),
        }
    }

    /// Feed the current pin levels
    ///
    /// Returns +1 for a clockwise detent, -1 for counter-clockwise, else 0.
    pub fn update(&mut self, a: bool, b: bool) -> i8 {
        if (a, b) == self.last {
            return 0;
        }
        self.last = (a, b);
        self.decode(a, b)
    }

    /// Quadrature encoding:
    /// CW:  A leads B (A changes first when rotating clockwise)
    /// CCW: B leads A (B changes first when rotating counter-clockwise)
    ///
    /// CW:  Idle (1,1) -> CwStep1 (0,1) -> CwStep2 (0,0) -> +1 -> Idle
    /// CCW: Idle (1,1) -> CcwStep1 (1,0) -> CcwStep2 (0,0) -> -1 -> Idle
    fn decode(&mut self, a: bool, b: bool) -> i8 {
        match self.state {
            State::Idle => {
                if !a && b {
                    self.state = State::CwStep1;
                } else if a && !b {
                    self.state = State::CcwStep1;
                }
                0
            }
            State::CwStep1 | State::CcwStep1 => {
                if !a && !b {
                    self.state = if self.state == State::CwStep1 {
                        State::CwStep2
                    } else {
                        State::CcwStep2
                    };
                } else if a && b {
                    // Bounce
                    self.state = State::Idle;
                }
                0
            }
            State::CwStep2 if a || b => {
                self.state = State::Idle;
                1
            }
            State::CcwStep2 if a || b => {
                self.state = State::Idle;
                -1
            }
            State::CwStep2 | State::CcwStep2 => 0,
        }
    }
}
