//! Heater output implementations

pub mod pwm;

pub use pwm::PwmHeater;
