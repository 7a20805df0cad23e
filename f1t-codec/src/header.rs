//! Common packet header
//!
//! Every datagram starts with the same 29-byte little-endian header. Field
//! values are passed through untouched; the protocol is versioned by the
//! publisher and only the offsets matter here.

use crate::reader::PayloadReader;
use crate::wire::HEADER_SIZE;
use f1t_core::DecodeError;

#[derive(Debug, Clone, PartialEq)]
pub struct PacketHeader {
    pub packet_format: u16,
    pub game_year: u8,
    pub game_major_version: u8,
    pub game_minor_version: u8,
    pub packet_version: u8,
    pub packet_id: u8,
    pub session_uid: u64,
    /// Session time in seconds
    pub session_time: f32,
    pub frame_identifier: u32,
    pub overall_frame_identifier: u32,
    /// Focus car for per-car decoders; 255 = unset
    pub player_car_index: u8,
    pub secondary_player_car_index: u8,
}

impl PacketHeader {
    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        if data.len() < HEADER_SIZE {
            return Err(DecodeError::TruncatedHeader {
                len: data.len(),
                expected: HEADER_SIZE,
            });
        }
        let mut r = PayloadReader::new(data);
        Ok(PacketHeader {
            packet_format: r.u16()?,
            game_year: r.u8()?,
            game_major_version: r.u8()?,
            game_minor_version: r.u8()?,
            packet_version: r.u8()?,
            packet_id: r.u8()?,
            session_uid: r.u64()?,
            session_time: r.f32()?,
            frame_identifier: r.u32()?,
            overall_frame_identifier: r.u32()?,
            player_car_index: r.u8()?,
            secondary_player_car_index: r.u8()?,
        })
    }
}
