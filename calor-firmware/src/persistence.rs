//! Settings persistence on flash
//!
//! Bridges the synchronous [`SettingsStorage`] used by the station logic
//! to the async flash key-value store. The RP2040 flash driver runs in
//! blocking mode, so `block_on` returns after a single poll.

use embassy_futures::block_on;

use calor_core::traits::{SettingsStorage, StorageError};
use calor_hal_rp2040::flash::FlashError;
use calor_hal_rp2040::{FlashStorageTrait, StorageKey};

/// Settings record stored under [`StorageKey::Settings`]
pub struct FlashSettings<F> {
    flash: F,
}

impl<F: FlashStorageTrait> FlashSettings<F> {
    pub fn new(flash: F) -> Self {
        Self { flash }
    }
}

impl<F: FlashStorageTrait> SettingsStorage for FlashSettings<F> {
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, StorageError> {
        block_on(self.flash.read(StorageKey::Settings, buffer)).map_err(to_storage_error)
    }

    fn write(&mut self, data: &[u8]) -> Result<(), StorageError> {
        block_on(self.flash.write(StorageKey::Settings, data)).map_err(|e| {
            defmt::error!("Settings write failed: {:?}", e);
            to_storage_error(e)
        })
    }
}

fn to_storage_error(e: FlashError) -> StorageError {
    match e {
        FlashError::NotFound => StorageError::NotFound,
        FlashError::BufferTooSmall => StorageError::BufferTooSmall,
        _ => StorageError::Io,
    }
}
