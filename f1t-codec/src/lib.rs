//! F1 25 UDP packet decoding
//!
//! Pure decoders for the sim's little-endian, fixed-layout datagrams. Each
//! decoder takes the payload (datagram bytes after the 29-byte header) and,
//! for per-car packets, the focus car index from the header, and returns a
//! typed update or a [`DecodeError`]. Nothing here touches shared state.

pub mod damage;
pub mod event;
pub mod header;
pub mod lap;
pub mod participants;
pub mod reader;
pub mod session;
pub mod status;
pub mod telemetry;
pub mod wire;

pub use f1t_core::DecodeError;
pub use header::PacketHeader;
pub use wire::PacketId;

/// Slice out the focus car's fixed-size record from a multi-car payload.
///
/// Fails with `OffsetOutOfRange` when the record does not fit entirely
/// inside the payload, so a truncated datagram can never be read past.
pub(crate) fn car_record(payload: &[u8], index: u8, size: usize) -> Result<&[u8], DecodeError> {
    let offset = index as usize * size;
    if offset + size > payload.len() {
        return Err(DecodeError::OffsetOutOfRange {
            index,
            offset,
            len: payload.len(),
        });
    }
    Ok(&payload[offset..offset + size])
}
