//! Fixed-size binary encoding of [`Settings`]
//!
//! Layout: the postcard body (init marker first) followed by a
//! little-endian CRC32 of the body.

use super::{Settings, INIT_MARKER};

/// Length of the postcard-encoded body
pub const RECORD_BODY_LEN: usize = 39;

/// Length of a complete record (body + CRC32)
pub const RECORD_LEN: usize = RECORD_BODY_LEN + 4;

/// Reasons a stored record is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecordError {
    /// Record length differs from [`RECORD_LEN`]
    Length,
    /// First byte is not the init marker
    MarkerMismatch,
    /// Checksum does not match the body
    CrcMismatch,
    /// Body could not be decoded
    Decode,
    /// A field lies outside its editable range
    OutOfRange,
    /// Settings could not be encoded
    Encode,
}

/// Encode settings into a complete record
pub fn encode(settings: &Settings) -> Result<[u8; RECORD_LEN], RecordError> {
    let mut record = [0u8; RECORD_LEN];

    let body_len = postcard::to_slice(settings, &mut record[..RECORD_BODY_LEN])
        .map_err(|_| RecordError::Encode)?
        .len();
    if body_len != RECORD_BODY_LEN {
        return Err(RecordError::Encode);
    }

    let crc = crc32(&record[..RECORD_BODY_LEN]);
    record[RECORD_BODY_LEN..].copy_from_slice(&crc.to_le_bytes());

    Ok(record)
}

/// Decode and validate a complete record
///
/// The marker is checked before any field is decoded.
pub fn decode(bytes: &[u8]) -> Result<Settings, RecordError> {
    if bytes.len() != RECORD_LEN {
        return Err(RecordError::Length);
    }
    if bytes[0] != INIT_MARKER {
        return Err(RecordError::MarkerMismatch);
    }

    let (body, trailer) = bytes.split_at(RECORD_BODY_LEN);
    let mut stored = [0u8; 4];
    stored.copy_from_slice(trailer);
    if u32::from_le_bytes(stored) != crc32(body) {
        return Err(RecordError::CrcMismatch);
    }

    let settings: Settings = postcard::from_bytes(body).map_err(|_| RecordError::Decode)?;

    if !settings.is_within_limits() {
        return Err(RecordError::OutOfRange);
    }

    Ok(settings)
}

/// CRC32 (IEEE 802.3)
pub fn crc32(data: &[u8]) -> u32 {
    !crc32_update(0xFFFF_FFFF, data)
}

fn crc32_update(mut crc: u32, data: &[u8]) -> u32 {
    const POLY: u32 = 0xEDB8_8320;

    for &byte in data {
        crc ^= byte as u32;
        for _ in 0..8 {
            crc = if crc & 1 != 0 { (crc >> 1) ^ POLY } else { crc >> 1 };
        }
    }

    crc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemorySlot;

    #[test]
    fn test_crc32_check_value() {
        assert_eq!(crc32(b"123456789"), 0xCBF4_3926);
    }

    #[test]
    fn test_record_layout() {
        let record = encode(&Settings::factory_defaults()).unwrap();
        assert_eq!(record[0], INIT_MARKER);
        // standby_temperature = 150.0
        assert_eq!(&record[1..5], &150.0f32.to_le_bytes());
        // standby_timeout_s = 60, fixed width
        assert_eq!(&record[5..7], &[60, 0]);
        // last_selected_memory is the final body byte
        assert_eq!(record[RECORD_BODY_LEN - 1], 0);
    }

    #[test]
    fn test_decode_encoded() {
        let mut settings = Settings::factory_defaults();
        settings.standby_timeout_s = 300;
        settings.auto_off_timeout_min = 120;
        settings.last_selected_memory = MemorySlot::Three;

        let record = encode(&settings).unwrap();
        assert_eq!(decode(&record), Ok(settings));
    }

    #[test]
    fn test_marker_mismatch() {
        let mut record = encode(&Settings::factory_defaults()).unwrap();
        record[0] = 0xFF;
        assert_eq!(decode(&record), Err(RecordError::MarkerMismatch));
    }

    #[test]
    fn test_erased_flash_is_rejected() {
        assert_eq!(decode(&[0xFF; RECORD_LEN]), Err(RecordError::MarkerMismatch));
    }

    #[test]
    fn test_corrupted_body() {
        let mut record = encode(&Settings::factory_defaults()).unwrap();
        record[10] ^= 0x01;
        assert_eq!(decode(&record), Err(RecordError::CrcMismatch));
    }

    #[test]
    fn test_wrong_length() {
        let record = encode(&Settings::factory_defaults()).unwrap();
        assert_eq!(decode(&record[..RECORD_LEN - 1]), Err(RecordError::Length));
    }

    #[test]
    fn test_out_of_range_record() {
        let mut settings = Settings::factory_defaults();
        settings.standby_timeout_s = 5;
        let record = encode(&settings).unwrap();
        assert_eq!(decode(&record), Err(RecordError::OutOfRange));
    }
}
