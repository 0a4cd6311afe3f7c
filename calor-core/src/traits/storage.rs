//! Settings persistence backend

/// Errors from the persistence backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// Nothing has been stored yet
    NotFound,
    /// Caller buffer cannot hold the stored record
    BufferTooSmall,
    /// Underlying medium failed
    Io,
}

/// Byte-level storage for the single settings record
///
/// A write must be all-or-nothing: a later read returns either the
/// previous record or the new one.
pub trait SettingsStorage {
    /// Read the stored record into `buffer`, returning its length
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, StorageError>;

    /// Replace the stored record
    fn write(&mut self, data: &[u8]) -> Result<(), StorageError>;
}
