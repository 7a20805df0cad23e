//! CarStatus packet decoder
//!
//! One fixed 55-byte record per car; only the focus car's record is read.

use crate::reader::PayloadReader;
use crate::wire::CAR_STATUS_SIZE;
use crate::{car_record, DecodeError};
use f1t_core::snapshot::CarStatusState;

pub fn decode_car_status(payload: &[u8], focus: u8) -> Result<CarStatusState, DecodeError> {
    let record = car_record(payload, focus, CAR_STATUS_SIZE)?;
    let mut r = PayloadReader::new(record);
    r.skip(4)?; // traction control, ABS, fuel mix, front brake bias
    let pit_limiter = r.u8()? != 0; // 4
    r.skip(8)?; // fuel in tank, fuel capacity
    let fuel_remaining_laps = r.f32()?; // 13
    r.skip(5)?; // max RPM, idle RPM, max gears
    let drs_allowed = r.u8()? != 0; // 22
    r.skip(3)?; // DRS activation distance, actual tyre compound
    let visual_tyre_compound = r.u8()?; // 26
    let tyre_age_laps = r.u8()?; // 27
    let fia_flag = r.i8()?; // 28
    r.skip(8)?; // engine power ICE, engine power MGU-K
    let ers_store_energy = r.f32()?; // 37
    let ers_deploy_mode = r.u8()?; // 41

    Ok(CarStatusState {
        pit_limiter,
        fuel_remaining_laps,
        fia_flag,
        visual_tyre_compound,
        tyre_age_laps,
        ers_store_energy,
        ers_deploy_mode,
        drs_allowed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_record() -> [u8; CAR_STATUS_SIZE] {
        let mut record = [0u8; CAR_STATUS_SIZE];
        record[4] = 1; // pit limiter on
        record[13..17].copy_from_slice(&23.7f32.to_le_bytes()); // fuel laps
        record[22] = 1; // drs allowed
        record[26] = 16; // visual compound: soft
        record[27] = 9; // tyre age
        record[28] = (-1i8) as u8; // FIA flag: unknown
        record[37..41].copy_from_slice(&3_450_000.0f32.to_le_bytes()); // ERS joules
        record[41] = 3; // deploy mode: overtake
        record
    }

    #[test]
    fn test_decode_focus_car_fields() {
        let mut payload = vec![0u8; 2 * CAR_STATUS_SIZE];
        payload.extend_from_slice(&status_record()); // car 2

        let state = decode_car_status(&payload, 2).unwrap();
        assert!(state.pit_limiter);
        assert_eq!(state.fuel_remaining_laps, 23.7);
        assert!(state.drs_allowed);
        assert_eq!(state.visual_tyre_compound, 16);
        assert_eq!(state.tyre_age_laps, 9);
        assert_eq!(state.fia_flag, -1);
        assert_eq!(state.ers_store_energy, 3_450_000.0);
        assert_eq!(state.ers_deploy_mode, 3);
    }

    #[test]
    fn test_signed_fia_flag_values() {
        let mut record = status_record();
        record[28] = 3; // yellow
        let state = decode_car_status(&record, 0).unwrap();
        assert_eq!(state.fia_flag, 3);
    }

    #[test]
    fn test_focus_beyond_payload() {
        let payload = vec![0u8; CAR_STATUS_SIZE];
        assert!(matches!(
            decode_car_status(&payload, 1),
            Err(DecodeError::OffsetOutOfRange { index: 1, .. })
        ));
    }
}
