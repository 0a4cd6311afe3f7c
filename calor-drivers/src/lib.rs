//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in calor-core for the station's hardware:
//!
//! - Heater output (PWM through a MOSFET)
//! - Tip temperature sensor (NTC 100K thermistor)
//! - Rotary encoder with push-button (quadrature decoding, click/double-click/hold)
//!
//! Drivers are generic over `embedded-hal` traits and contain no chip
//! specific code.

#![no_std]
#![deny(unsafe_code)]

pub mod heater;
pub mod input;
pub mod sensor;
