//! CarTelemetry packet decoder
//!
//! One fixed 60-byte record per car; only the focus car's record is read.

use crate::reader::PayloadReader;
use crate::wire::CAR_TELEMETRY_SIZE;
use crate::{car_record, DecodeError};
use f1t_core::snapshot::TelemetryState;

pub fn decode_car_telemetry(payload: &[u8], focus: u8) -> Result<TelemetryState, DecodeError> {
    let record = car_record(payload, focus, CAR_TELEMETRY_SIZE)?;
    let mut r = PayloadReader::new(record);
    let speed_kph = r.u16()?; // 0
    let throttle = r.f32()?; // 2
    r.skip(4)?; // steering
    let brake = r.f32()?; // 10
    r.skip(1)?; // clutch
    let gear = r.i8()?; // 15
    let engine_rpm = r.u16()?; // 16
    let drs_open = r.u8()? != 0; // 18
    r.skip(11)?; // rev lights percent + bit value, brake temperatures
    let mut tyre_surface_temperature = [0u8; 4]; // 30, [RL, RR, FL, FR]
    for temp in tyre_surface_temperature.iter_mut() {
        *temp = r.u8()?;
    }

    Ok(TelemetryState {
        speed_kph,
        throttle,
        brake,
        gear,
        engine_rpm,
        drs_open,
        tyre_surface_temperature,
    })
}
