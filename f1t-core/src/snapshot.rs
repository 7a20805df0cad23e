//! Race state snapshot model
//!
//! A single `Snapshot` aggregates everything decoded from the UDP stream:
//! session conditions, the focus car's lap/telemetry/status/damage, the
//! driver roster, event-driven state and the weather forecast. The engine
//! is the only writer; each field group is replaced whole by a successful
//! decode and left untouched by a failed one.
//!
//! Tyre arrays are indexed [rear-left, rear-right, front-left, front-right],
//! matching the wire order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sentinel car index meaning "no car" (fastest lap not set, no focus car).
pub const UNSET_CAR_INDEX: u8 = 255;

/// Session-wide conditions from the Session packet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    /// Weather code (0 clear .. 5 storm), see [`crate::codes::weather_name`]
    pub weather: u8,
    pub track_temperature: i8,
    pub air_temperature: i8,
    pub total_laps: u8,
    /// Track length in metres
    pub track_length: u16,
    pub session_type: u8,
    pub track_id: i8,
    /// Seconds remaining in the session
    pub session_time_left: u16,
    pub safety_car_status: u8,
    /// Car index currently holding P1, derived from the LapData leader scan
    pub leader_index: Option<u8>,
}

/// Lap state for the focus car.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LapState {
    pub last_lap_time_ms: u32,
    pub current_lap_time_ms: u32,
    /// Last lap rendered as "m:ss.mmm"
    pub last_lap_time_text: String,
    /// 1-based race position
    pub car_position: u8,
    pub current_lap_number: u8,
    pub pit_status: u8,
    /// 0-based sector index
    pub sector: u8,
    pub current_lap_invalid: bool,
    pub penalties: u8,
}

/// Live car telemetry for the focus car.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetryState {
    pub speed_kph: u16,
    /// 0.0 to 1.0
    pub throttle: f32,
    /// 0.0 to 1.0
    pub brake: f32,
    /// -1 = reverse, 0 = neutral, 1+ = forward gears
    pub gear: i8,
    pub engine_rpm: u16,
    pub drs_open: bool,
    /// Surface temperature in Celsius, [RL, RR, FL, FR]
    pub tyre_surface_temperature: [u8; 4],
}

/// Car status for the focus car.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CarStatusState {
    pub pit_limiter: bool,
    pub fuel_remaining_laps: f32,
    /// FIA flag shown to this car; -1 = unknown
    pub fia_flag: i8,
    pub visual_tyre_compound: u8,
    pub tyre_age_laps: u8,
    /// ERS store in joules
    pub ers_store_energy: f32,
    pub ers_deploy_mode: u8,
    pub drs_allowed: bool,
}

/// Damage readout for the focus car.
///
/// `terminal` is sticky: only a retirement event for the focus car sets it,
/// and no damage packet ever clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CarDamageState {
    /// Wear percentage, [RL, RR, FL, FR]
    pub tyre_wear: [f32; 4],
    pub front_left_wing: u8,
    pub front_right_wing: u8,
    pub rear_wing: u8,
    pub floor: u8,
    pub diffuser: u8,
    pub sidepod: u8,
    pub has_damage: bool,
    pub terminal: bool,
}

/// Driver display names keyed by car index.
///
/// Entries are overwritten per Participants packet and never removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParticipantRegistry {
    drivers: BTreeMap<u8, String>,
}

impl ParticipantRegistry {
    pub fn set_name(&mut self, car_index: u8, name: String) {
        self.drivers.insert(car_index, name);
    }

    pub fn name(&self, car_index: u8) -> Option<&str> {
        self.drivers.get(&car_index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.drivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &str)> {
        self.drivers.iter().map(|(i, n)| (*i, n.as_str()))
    }
}

/// Fastest lap of the session, from the FTLP event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FastestLapRecord {
    /// 255 until a fastest lap has been set
    pub car_index: u8,
    /// Lap time in seconds
    pub lap_time: f32,
}

impl Default for FastestLapRecord {
    fn default() -> Self {
        Self {
            car_index: UNSET_CAR_INDEX,
            lap_time: 0.0,
        }
    }
}

/// Event-driven state: start lights and the session status machine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventState {
    /// Number of start lights currently lit (0-5)
    pub start_lights: u8,
    pub session_status: SessionStatus,
}

/// Session lifecycle status.
///
/// SSTA/SEND/CHQF events drive Started/Ended/ChequeredFlag directly; the
/// Session packet promotes Unknown/Inactive to Active while a known session
/// type has time remaining, and demotes Active to Ended once it no longer
/// does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    #[default]
    Unknown,
    Inactive,
    Active,
    Started,
    Ended,
    ChequeredFlag,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            SessionStatus::Unknown => "Unknown",
            SessionStatus::Inactive => "Inactive",
            SessionStatus::Active => "Active",
            SessionStatus::Started => "Started",
            SessionStatus::Ended => "Ended",
            SessionStatus::ChequeredFlag => "Chequered Flag",
        };
        f.write_str(label)
    }
}

/// One predicted weather point: `minute_offset` minutes into the future,
/// `rain_probability` in percent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastSample {
    pub minute_offset: u8,
    pub rain_probability: u8,
}

/// The aggregate race state read by consumers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub session: SessionState,
    pub lap: LapState,
    pub telemetry: TelemetryState,
    pub car_status: CarStatusState,
    pub car_damage: CarDamageState,
    pub participants: ParticipantRegistry,
    pub fastest_lap: FastestLapRecord,
    pub events: EventState,
    pub forecast: Vec<ForecastSample>,
    /// When the snapshot last changed; None until the first merge
    pub last_updated: Option<DateTime<Utc>>,
}

/// Render a lap time in milliseconds as "m:ss.mmm".
///
/// Zero (no lap set yet) renders as "0:00.000". Minutes wrap at 60, matching
/// the wire format's minute field elsewhere in the protocol.
pub fn format_lap_time(lap_time_ms: u32) -> String {
    if lap_time_ms == 0 {
        return "0:00.000".to_string();
    }
    let minutes = (lap_time_ms / 60_000) % 60;
    let seconds = (lap_time_ms as f64 / 1000.0) % 60.0;
    format!("{}:{:06.3}", minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_lap_time_zero() {
        assert_eq!(format_lap_time(0), "0:00.000");
    }

    #[test]
    fn test_format_lap_time_typical() {
        assert_eq!(format_lap_time(61_234), "1:01.234");
        assert_eq!(format_lap_time(83_456), "1:23.456");
    }

    #[test]
    fn test_format_lap_time_exact_minute() {
        assert_eq!(format_lap_time(60_000), "1:00.000");
    }

    #[test]
    fn test_format_lap_time_sub_minute() {
        assert_eq!(format_lap_time(999), "0:00.999");
        assert_eq!(format_lap_time(59_999), "0:59.999");
    }

    #[test]
    fn test_format_lap_time_minutes_wrap_at_sixty() {
        // One hour wraps back to zero minutes
        assert_eq!(format_lap_time(3_600_000), "0:00.000");
        assert_eq!(format_lap_time(3_661_234), "1:01.234");
    }

    #[test]
    fn test_fastest_lap_default_is_unset() {
        let record = FastestLapRecord::default();
        assert_eq!(record.car_index, UNSET_CAR_INDEX);
        assert_eq!(record.lap_time, 0.0);
    }

    #[test]
    fn test_session_status_default_and_display() {
        assert_eq!(SessionStatus::default(), SessionStatus::Unknown);
        assert_eq!(SessionStatus::ChequeredFlag.to_string(), "Chequered Flag");
        assert_eq!(SessionStatus::Active.to_string(), "Active");
    }

    #[test]
    fn test_participant_registry_overwrites_by_index() {
        let mut registry = ParticipantRegistry::default();
        registry.set_name(3, "HAMILTON".to_string());
        registry.set_name(3, "VERSTAPPEN".to_string());
        registry.set_name(7, "LECLERC".to_string());

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.name(3), Some("VERSTAPPEN"));
        assert_eq!(registry.name(7), Some("LECLERC"));
        assert_eq!(registry.name(0), None);
    }

    #[test]
    fn test_snapshot_serialization_roundtrip() {
        let mut snapshot = Snapshot::default();
        snapshot.telemetry.speed_kph = 287;
        snapshot.telemetry.gear = 7;
        snapshot.lap.last_lap_time_text = format_lap_time(92_413);
        snapshot.participants.set_name(0, "ALONSO".to_string());
        snapshot.forecast.push(ForecastSample {
            minute_offset: 5,
            rain_probability: 40,
        });

        let json = serde_json::to_string(&snapshot).unwrap();
        let decoded: Snapshot = serde_json::from_str(&json).unwrap();

        assert_eq!(decoded, snapshot);
        assert_eq!(decoded.lap.last_lap_time_text, "1:32.413");
    }
}
