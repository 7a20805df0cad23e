//! Participants packet decoder
//!
//! A count byte followed by fixed 57-byte entries. Only the driver name
//! (32 NUL-padded UTF-8 bytes at entry offset 7) is kept. One bad entry is
//! skipped without losing the rest.

use crate::reader::read_name_field;
use crate::wire::{MAX_CARS, PARTICIPANT_SIZE};
use f1t_core::DecodeError;

/// Byte offset and width of the name field within an entry.
const NAME_OFFSET: usize = 7;
const NAME_LEN: usize = 32;

/// Decoded (car index, driver name) pairs, index ascending.
pub fn decode_participants(payload: &[u8]) -> Result<Vec<(u8, String)>, DecodeError> {
    let count = *payload
        .first()
        .ok_or(DecodeError::FieldDecode { offset: 0 })? as usize;

    let mut names = Vec::new();
    for i in 0..count.min(MAX_CARS) {
        let at = 1 + i * PARTICIPANT_SIZE;
        if at + PARTICIPANT_SIZE > payload.len() {
            break;
        }
        let field = &payload[at + NAME_OFFSET..at + NAME_OFFSET + NAME_LEN];
        match read_name_field(field) {
            Ok(name) => names.push((i as u8, name.to_string())),
            // Skip the entry, keep decoding the rest
            Err(_) => continue,
        }
    }
    Ok(names)
}
