//! LapData packet decoder
//!
//! The payload holds one fixed 57-byte record per car. The focus car's
//! record becomes the LapState; independently, all whole records are
//! scanned for the car holding P1 to derive the session leader.

use crate::reader::PayloadReader;
use crate::wire::{LAP_DATA_SIZE, MAX_CARS};
use crate::{car_record, DecodeError};
use f1t_core::snapshot::{format_lap_time, LapState};

/// Byte offset of the car-position field within a lap record.
const POSITION_OFFSET: usize = 32;

#[derive(Debug, Clone, PartialEq)]
pub struct LapUpdate {
    pub lap: LapState,
    /// Index of the first car whose position field is 1, if any
    pub leader_index: Option<u8>,
}

pub fn decode_lap_data(payload: &[u8], focus: u8) -> Result<LapUpdate, DecodeError> {
    let record = car_record(payload, focus, LAP_DATA_SIZE)?;
    let mut r = PayloadReader::new(record);
    let last_lap_time_ms = r.u32()?;
    let current_lap_time_ms = r.u32()?;
    r.skip(12)?; // sector 1/2 and delta time parts
    r.skip(12)?; // lap distance, total distance, safety car delta
    let car_position = r.u8()?;
    let current_lap_number = r.u8()?;
    let pit_status = r.u8()?;
    r.skip(1)?; // pit stop count
    let sector = r.u8()?;
    let current_lap_invalid = r.u8()? != 0;
    let penalties = r.u8()?;

    let lap = LapState {
        last_lap_time_ms,
        current_lap_time_ms,
        last_lap_time_text: format_lap_time(last_lap_time_ms),
        car_position,
        current_lap_number,
        pit_status,
        sector,
        current_lap_invalid,
        penalties,
    };

    Ok(LapUpdate {
        lap,
        leader_index: find_leader(payload),
    })
}

/// Scan every whole car record for position == 1, car-index ascending,
/// first match wins.
fn find_leader(payload: &[u8]) -> Option<u8> {
    let records = (payload.len() / LAP_DATA_SIZE).min(MAX_CARS);
    (0..records).find_map(|i| {
        let position = payload[i * LAP_DATA_SIZE + POSITION_OFFSET];
        (position == 1).then_some(i as u8)
    })
}
