//! Session packet decoder
//!
//! The Session payload opens with a 19-byte scalar block, followed by the
//! marshal-zone region (21 fixed 5-byte records, contents not decoded),
//! the safety-car-status byte, and the weather forecast region (count byte
//! plus 8-byte samples). Any decode failure aborts the whole update.

use crate::reader::PayloadReader;
use crate::wire::{FORECAST_SAMPLE_SIZE, MARSHAL_ZONE_SIZE, NUM_MARSHAL_ZONES};
use f1t_core::snapshot::ForecastSample;
use f1t_core::DecodeError;

/// Byte length of the leading scalar block.
const SCALAR_BLOCK_SIZE: usize = 19;

/// The safety-car-status byte sits immediately after the marshal zones.
const SAFETY_CAR_OFFSET: usize = SCALAR_BLOCK_SIZE + NUM_MARSHAL_ZONES * MARSHAL_ZONE_SIZE;

/// Forecast region: network-game byte, then the sample count, then samples.
const FORECAST_COUNT_OFFSET: usize = SAFETY_CAR_OFFSET + 2;

/// Offsets of the fields taken from each 8-byte forecast sample.
const SAMPLE_MINUTE_OFFSET: usize = 1;
const SAMPLE_RAIN_OFFSET: usize = 7;

/// Decoded session fields. `forecast` is None when the payload ends before
/// the forecast region, in which case the stored forecast is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionUpdate {
    pub weather: u8,
    pub track_temperature: i8,
    pub air_temperature: i8,
    pub total_laps: u8,
    pub track_length: u16,
    pub session_type: u8,
    pub track_id: i8,
    pub session_time_left: u16,
    pub safety_car_status: u8,
    pub forecast: Option<Vec<ForecastSample>>,
}

pub fn decode_session(payload: &[u8]) -> Result<SessionUpdate, DecodeError> {
    let mut r = PayloadReader::new(payload);
    let weather = r.u8()?;
    let track_temperature = r.i8()?;
    let air_temperature = r.i8()?;
    let total_laps = r.u8()?;
    let track_length = r.u16()?;
    let session_type = r.u8()?;
    let track_id = r.i8()?;
    r.skip(1)?; // formula
    let session_time_left = r.u16()?;
    r.skip(2)?; // session duration
    // pit speed limit, game paused, spectating, spectator index,
    // SLI Pro support, marshal zone count
    r.skip(6)?;

    let safety_car_status = payload.get(SAFETY_CAR_OFFSET).copied().unwrap_or(0);

    let forecast = if payload.len() > FORECAST_COUNT_OFFSET {
        let count = payload[FORECAST_COUNT_OFFSET] as usize;
        let first_sample = FORECAST_COUNT_OFFSET + 1;
        let mut samples = Vec::with_capacity(count);
        for i in 0..count {
            let at = first_sample + i * FORECAST_SAMPLE_SIZE;
            // Partial trailing samples are not reported
            if at + FORECAST_SAMPLE_SIZE > payload.len() {
                break;
            }
            samples.push(ForecastSample {
                minute_offset: payload[at + SAMPLE_MINUTE_OFFSET],
                rain_probability: payload[at + SAMPLE_RAIN_OFFSET],
            });
        }
        Some(samples)
    } else {
        None
    };

    Ok(SessionUpdate {
        weather,
        track_temperature,
        air_temperature,
        total_laps,
        track_length,
        session_type,
        track_id,
        session_time_left,
        safety_car_status,
        forecast,
    })
}
