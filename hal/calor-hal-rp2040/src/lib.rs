//! RP2040-specific HAL for the soldering station firmware
//!
//! Implements the shared `calor-hal` traits for the RP2040:
//!
//! - Flash storage driver (implements `calor_hal::FlashStorage`)

#![no_std]

pub mod flash;

// Re-export shared traits from calor-hal for convenience
pub use calor_hal::{FlashStorage as FlashStorageTrait, StorageKey};
