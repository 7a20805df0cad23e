//! Event packet decoder
//!
//! Events carry a 4-byte ASCII code followed by code-specific fields.
//! Codes this engine does not react to decode as `Unrecognised` and are
//! dropped without error; a malformed code aborts only this decoder call.

use crate::reader::PayloadReader;
use f1t_core::DecodeError;

/// Retirement reason byte meaning the car is terminally damaged.
pub const RETIREMENT_REASON_TERMINAL_DAMAGE: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventUpdate {
    /// STLG: another start light lit
    StartLights { count: u8 },
    /// LGOT: lights out, race underway
    LightsOut,
    /// SSTA
    SessionStarted,
    /// SEND
    SessionEnded,
    /// CHQF
    ChequeredFlag,
    /// FTLP: new fastest lap of the session
    FastestLap { car_index: u8, lap_time: f32 },
    /// RTMT: a car retired from the session
    Retirement { car_index: u8, reason: u8 },
    /// Any other event code
    Unrecognised,
}

pub fn decode_event(payload: &[u8]) -> Result<EventUpdate, DecodeError> {
    let code = payload
        .get(..4)
        .and_then(|bytes| std::str::from_utf8(bytes).ok())
        .ok_or(DecodeError::FieldDecode { offset: 0 })?;

    let mut r = PayloadReader::new(&payload[4..]);
    let update = match code {
        "STLG" => EventUpdate::StartLights { count: r.u8()? },
        "LGOT" => EventUpdate::LightsOut,
        "SSTA" => EventUpdate::SessionStarted,
        "SEND" => EventUpdate::SessionEnded,
        "CHQF" => EventUpdate::ChequeredFlag,
        "FTLP" => EventUpdate::FastestLap {
            car_index: r.u8()?,
            lap_time: r.f32()?,
        },
        "RTMT" => EventUpdate::Retirement {
            car_index: r.u8()?,
            reason: r.u8()?,
        },
        _ => EventUpdate::Unrecognised,
    };
    Ok(update)
}
