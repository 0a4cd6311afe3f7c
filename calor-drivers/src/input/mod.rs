//! Rotary encoder input
//!
//! [`ClickEncoder`] is serviced every millisecond independently of the
//! main loop. It decodes rotation with a [`QuadratureDecoder`] and
//! classifies the push-button with a [`ButtonClassifier`]; the main loop
//! collects both with [`ClickEncoder::take_snapshot`].

pub mod button;
pub mod click_encoder;
pub mod quadrature;

pub use button::{ButtonClassifier, ButtonTiming};
pub use click_encoder::ClickEncoder;
pub use quadrature::QuadratureDecoder;
