//! Settings lifecycle on top of a [`SettingsStorage`] backend

use super::record::{self, RecordError, RECORD_LEN};
use super::Settings;
use crate::traits::{SettingsStorage, StorageError};

/// Why a stored record could not be used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoadError {
    Storage(StorageError),
    Record(RecordError),
}

/// Why settings could not be written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PersistError {
    Storage(StorageError),
    Record(RecordError),
}

/// Outcome of loading settings at boot
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Loaded {
    /// A valid record was found
    Stored(Settings),
    /// The stored record was unusable; defaults were written in its place
    FactoryDefaults { settings: Settings, reason: LoadError },
}

impl Loaded {
    /// The settings to run with
    pub fn settings(&self) -> Settings {
        match self {
            Loaded::Stored(settings) | Loaded::FactoryDefaults { settings, .. } => *settings,
        }
    }

    /// A factory reset at boot requires a restart
    pub fn requires_restart(&self) -> bool {
        matches!(self, Loaded::FactoryDefaults { .. })
    }
}

/// Loads, persists and resets the settings record
pub struct SettingsStore<S> {
    storage: S,
}

impl<S: SettingsStorage> SettingsStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Access the storage backend
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Consume the store and return the backend
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Load the stored record, falling back to factory defaults
    ///
    /// On fallback the defaults are persisted before returning.
    pub fn load(&mut self) -> Loaded {
        match self.try_load() {
            Ok(settings) => Loaded::Stored(settings),
            Err(reason) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Stored settings rejected ({}), restoring defaults", reason);

                Loaded::FactoryDefaults {
                    settings: self.reset_factory_defaults(),
                    reason,
                }
            }
        }
    }

    /// Load and validate the stored record
    pub fn try_load(&mut self) -> Result<Settings, LoadError> {
        let mut buffer = [0u8; RECORD_LEN];
        let len = self
            .storage
            .read(&mut buffer)
            .map_err(LoadError::Storage)?;

        record::decode(&buffer[..len]).map_err(LoadError::Record)
    }

    /// Write the full record
    pub fn persist(&mut self, settings: &Settings) -> Result<(), PersistError> {
        let record = record::encode(settings).map_err(PersistError::Record)?;
        self.storage.write(&record).map_err(PersistError::Storage)
    }

    /// Overwrite the stored record with factory defaults
    ///
    /// Returns the defaults even if persisting them failed.
    pub fn reset_factory_defaults(&mut self) -> Settings {
        let defaults = Settings::factory_defaults();

        if let Err(_e) = self.persist(&defaults) {
            #[cfg(feature = "defmt")]
            defmt::error!("Failed to persist factory defaults: {}", _e);
        }

        defaults
    }
}

/// In-memory storage backend
///
/// Used for host-side tests and simulation.
#[derive(Debug, Clone, Default)]
pub struct RamStorage {
    record: Option<heapless::Vec<u8, RECORD_LEN>>,
    writes: usize,
    fail_writes: bool,
}

impl RamStorage {
    /// Empty storage (nothing ever written)
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-filled with raw bytes
    ///
    /// Bytes beyond [`RECORD_LEN`] are dropped.
    pub fn with_bytes(bytes: &[u8]) -> Self {
        let len = bytes.len().min(RECORD_LEN);
        Self {
            record: heapless::Vec::from_slice(&bytes[..len]).ok(),
            ..Self::default()
        }
    }

    /// Make every subsequent write fail
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Stored bytes, if any
    pub fn bytes(&self) -> Option<&[u8]> {
        self.record.as_deref()
    }

    /// Number of successful writes
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl SettingsStorage for RamStorage {
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, StorageError> {
        let record = self.record.as_ref().ok_or(StorageError::NotFound)?;
        if buffer.len() < record.len() {
            return Err(StorageError::BufferTooSmall);
        }
        buffer[..record.len()].copy_from_slice(record);
        Ok(record.len())
    }

    fn write(&mut self, data: &[u8]) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Io);
        }
        let record = heapless::Vec::from_slice(data).map_err(|_| StorageError::BufferTooSmall)?;
        self.record = Some(record);
        self.writes += 1;
        Ok(())
    }
}
