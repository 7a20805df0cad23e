//! Decode error taxonomy
//!
//! Every failure in the decode path is local and non-fatal: it drops the
//! offending packet (or participant entry) and leaves the last known-good
//! snapshot values in place. These variants exist so the engine can log
//! precisely what was dropped.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("datagram of {len} bytes is shorter than the {expected}-byte packet header")]
    TruncatedHeader { len: usize, expected: usize },

    #[error("packet id {id}: expected {expected} bytes, got {actual}")]
    SizeMismatch {
        id: u8,
        expected: usize,
        actual: usize,
    },

    #[error("car record {index} at offset {offset} does not fit a {len}-byte payload")]
    OffsetOutOfRange {
        index: u8,
        offset: usize,
        len: usize,
    },

    #[error("malformed field at payload offset {offset}")]
    FieldDecode { offset: usize },
}
