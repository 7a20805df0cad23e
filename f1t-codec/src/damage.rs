//! CarDamage packet decoder
//!
//! One fixed 46-byte record per car; only the focus car's record is read.
//! `has_damage` is derived here from the tyre-damage and bodywork bytes.
//! The snapshot's sticky `terminal` flag is owned by the event path and is
//! deliberately absent from this update.

use crate::reader::PayloadReader;
use crate::wire::CAR_DAMAGE_SIZE;
use crate::{car_record, DecodeError};

#[derive(Debug, Clone, PartialEq)]
pub struct DamageUpdate {
    /// Wear percentage, [RL, RR, FL, FR]
    pub tyre_wear: [f32; 4],
    pub front_left_wing: u8,
    pub front_right_wing: u8,
    pub rear_wing: u8,
    pub floor: u8,
    pub diffuser: u8,
    pub sidepod: u8,
    pub has_damage: bool,
}

pub fn decode_car_damage(payload: &[u8], focus: u8) -> Result<DamageUpdate, DecodeError> {
    let record = car_record(payload, focus, CAR_DAMAGE_SIZE)?;
    let mut r = PayloadReader::new(record);
    let mut tyre_wear = [0.0f32; 4]; // 0, [RL, RR, FL, FR]
    for wear in tyre_wear.iter_mut() {
        *wear = r.f32()?;
    }
    let mut tyre_damage = [0u8; 4]; // 16
    for damage in tyre_damage.iter_mut() {
        *damage = r.u8()?;
    }
    r.skip(8)?; // brake damage, tyre blisters
    let front_left_wing = r.u8()?; // 28
    let front_right_wing = r.u8()?;
    let rear_wing = r.u8()?;
    let floor = r.u8()?;
    let diffuser = r.u8()?;
    let sidepod = r.u8()?;

    let body = [
        front_left_wing,
        front_right_wing,
        rear_wing,
        floor,
        diffuser,
        sidepod,
    ];
    let has_damage =
        tyre_damage.iter().any(|&b| b != 0) || body.iter().any(|&b| b != 0);

    Ok(DamageUpdate {
        tyre_wear,
        front_left_wing,
        front_right_wing,
        rear_wing,
        floor,
        diffuser,
        sidepod,
        has_damage,
    })
}
