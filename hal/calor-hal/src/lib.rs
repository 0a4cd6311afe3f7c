//! Calor Hardware Abstraction Layer
//!
//! Chip-independent traits implemented by chip-specific HALs. The station
//! only needs one piece of hardware abstracted this way: the persistent
//! storage holding the settings record.
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (calor-firmware)           │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  calor-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │  calor-hal-   │
//!             │    rp2040     │
//!             └───────────────┘
//! ```

#![no_std]
#![deny(unsafe_code)]

pub mod flash;

pub use flash::{FlashError, FlashStorage, StorageKey};
