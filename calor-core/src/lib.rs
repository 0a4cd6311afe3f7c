//! Board-agnostic core logic for the soldering station firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Persisted settings record and its load/validate/persist/reset lifecycle
//! - PID control loop producing a bounded heater command
//! - Memory slots (three temperature presets) and store mode
//! - Standby automaton (inactivity power save, explicit and automatic wake)
//! - Menu automaton (main view input, settings navigation and editing)
//! - View descriptors consumed by an external renderer
//! - [`Device`], the single owned aggregate that threads all of the above
//!   through one main-loop iteration
//!
//! Hardware is reached only through the traits in [`traits`].

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod control;
pub mod device;
pub mod memory;
pub mod menu;
pub mod restart;
pub mod settings;
pub mod standby;
pub mod traits;
pub mod view;

pub use control::{ControlLoop, PidGains};
pub use device::{Device, Tick};
pub use memory::{MemorySlot, MemorySlots};
pub use menu::{Menu, MenuItem, Mode};
pub use restart::{PendingRestart, RestartReason};
pub use settings::{Field, Settings, SettingsStore};
pub use standby::{Standby, StandbyState};
pub use view::{MainView, SettingsView, View, ViewRenderer};
