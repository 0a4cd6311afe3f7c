//! Temperature presets
//!
//! Three slots hold preset temperatures inside the settings record.
//! A click outside store mode cycles the active slot and loads its
//! temperature; store mode (entered by holding the button) writes the
//! current setpoint into a chosen slot.

use serde::{Deserialize, Serialize};

use crate::settings::Settings;

/// One of the three preset slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MemorySlot {
    #[default]
    One,
    Two,
    Three,
}

impl MemorySlot {
    /// All slots in cycle order
    pub const ALL: [MemorySlot; 3] = [MemorySlot::One, MemorySlot::Two, MemorySlot::Three];

    /// Zero-based array index
    pub const fn index(self) -> usize {
        match self {
            MemorySlot::One => 0,
            MemorySlot::Two => 1,
            MemorySlot::Three => 2,
        }
    }

    /// One-based slot number as shown on screen
    pub const fn number(self) -> u8 {
        self.index() as u8 + 1
    }

    /// Next slot, wrapping from three back to one
    pub const fn next(self) -> Self {
        match self {
            MemorySlot::One => MemorySlot::Two,
            MemorySlot::Two => MemorySlot::Three,
            MemorySlot::Three => MemorySlot::One,
        }
    }

    /// Move one slot in `direction` (sign only), clamped to one..three
    pub fn step(self, direction: i8) -> Self {
        let index = (self.index() as i8 + direction.signum()).clamp(0, 2);
        Self::ALL[index as usize]
    }
}

/// Preset selection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MemorySlots {
    active: MemorySlot,
    /// `Some` while in store mode
    pending: Option<MemorySlot>,
}

impl MemorySlots {
    pub const fn new(active: MemorySlot) -> Self {
        Self {
            active,
            pending: None,
        }
    }

    /// Slot that last provided or received the setpoint
    pub fn active(&self) -> MemorySlot {
        self.active
    }

    /// Slot targeted by store mode
    pub fn pending(&self) -> Option<MemorySlot> {
        self.pending
    }

    pub fn store_mode(&self) -> bool {
        self.pending.is_some()
    }

    /// Enter store mode targeting the active slot
    ///
    /// Returns false if store mode was already active.
    pub fn enter_store_mode(&mut self) -> bool {
        if self.store_mode() {
            return false;
        }
        self.pending = Some(self.active);
        true
    }

    /// Leave store mode without writing anything
    pub fn cancel_store_mode(&mut self) {
        self.pending = None;
    }

    /// Move the store target
    pub fn select_pending(&mut self, direction: i8) {
        if let Some(pending) = self.pending {
            self.pending = Some(pending.step(direction));
        }
    }

    /// Write `setpoint` into the pending slot and leave store mode
    ///
    /// The slot becomes active and is remembered as the boot preset.
    /// Returns the written slot, or `None` outside store mode.
    pub fn commit(&mut self, setpoint: f32, settings: &mut Settings) -> Option<MemorySlot> {
        let slot = self.pending.take()?;
        settings.set_memory(slot, setpoint);
        settings.last_selected_memory = slot;
        self.active = slot;
        Some(slot)
    }

    /// Advance the active slot and return its temperature
    ///
    /// The selection is recorded in `settings` but not persisted.
    pub fn cycle(&mut self, settings: &mut Settings) -> f32 {
        self.active = self.active.next();
        settings.last_selected_memory = self.active;
        settings.memory(self.active)
    }

    /// Follow a setpoint that was dialed onto another preset's value
    ///
    /// Like [`cycle`](Self::cycle), the selection is recorded in `settings`
    /// but not persisted.
    pub fn track(&mut self, setpoint: f32, settings: &mut Settings) {
        if settings.memory(self.active) == setpoint {
            return;
        }
        if let Some(slot) = MemorySlot::ALL
            .into_iter()
            .find(|&slot| settings.memory(slot) == setpoint)
        {
            self.active = slot;
            settings.last_selected_memory = slot;
        }
    }

    /// The active slot, if its temperature equals `setpoint`
    pub fn matching(&self, setpoint: f32, settings: &Settings) -> Option<MemorySlot> {
        if settings.memory(self.active) == setpoint {
            Some(self.active)
        } else {
            None
        }
    }
}
