//! Decode-and-merge engine
//!
//! The single writer of the race-state snapshot. Datagrams arrive over an
//! mpsc channel from the UDP listener and are processed one at a time:
//! header decode, size sanity check, raw forwarding, dispatch to the
//! packet-type decoder, snapshot merge, then a throttled change
//! notification. A failed decode drops exactly that packet and leaves the
//! affected field group at its last known-good value.

use crate::forward::Forwarder;
use crate::state::AppState;
use crate::throttle::NotifyThrottle;
use chrono::Utc;
use f1t_codec::damage::decode_car_damage;
use f1t_codec::event::{decode_event, EventUpdate, RETIREMENT_REASON_TERMINAL_DAMAGE};
use f1t_codec::lap::decode_lap_data;
use f1t_codec::participants::decode_participants;
use f1t_codec::session::{decode_session, SessionUpdate};
use f1t_codec::status::decode_car_status;
use f1t_codec::telemetry::decode_car_telemetry;
use f1t_codec::wire::HEADER_SIZE;
use f1t_codec::{PacketHeader, PacketId};
use f1t_core::snapshot::{CarDamageState, FastestLapRecord, SessionState};
use f1t_core::{DecodeError, SessionStatus, Snapshot};
use std::time::Instant;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

pub struct Engine {
    state: AppState,
    forwarder: Option<Forwarder>,
    throttle: NotifyThrottle,
}

impl Engine {
    pub fn new(state: AppState, forwarder: Option<Forwarder>) -> Self {
        Self {
            state,
            forwarder,
            throttle: NotifyThrottle::default(),
        }
    }

    /// Replace the forwarding destination whole. The old socket is dropped
    /// and the new one is used from the next datagram on.
    pub fn set_forwarder(&mut self, forwarder: Option<Forwarder>) {
        self.forwarder = forwarder;
    }

    /// Consume datagrams until the channel closes or cancellation fires.
    pub async fn run(mut self, mut rx: mpsc::Receiver<Vec<u8>>, cancel: CancellationToken) {
        info!("Decode engine started");
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                received = rx.recv() => match received {
                    Some(datagram) => self.process_datagram(&datagram).await,
                    None => break,
                },
            }
        }
        info!("Decode engine stopped");
    }

    /// Handle one raw datagram end to end.
    pub async fn process_datagram(&mut self, data: &[u8]) {
        let header = match PacketHeader::decode(data) {
            Ok(header) => header,
            Err(e) => {
                debug!("Dropped datagram: {e}");
                return;
            }
        };

        let packet_id = PacketId::from_u8(header.packet_id);

        // Sanity-check the length for ids whose total size is known;
        // unknown-size ids pass through unchecked.
        if let Some(expected) = packet_id.and_then(PacketId::expected_size) {
            if data.len() != expected {
                let e = DecodeError::SizeMismatch {
                    id: header.packet_id,
                    expected,
                    actual: data.len(),
                };
                debug!("Dropped datagram: {e}");
                return;
            }
        }

        // Accepted: relay the full original bytes before decoding
        if let Some(forwarder) = &self.forwarder {
            forwarder.send(data);
        }

        let Some(packet_id) = packet_id else {
            // Unknown packet id from a newer protocol version
            return;
        };
        if !packet_id.is_relevant() {
            return;
        }

        let payload = &data[HEADER_SIZE..];
        {
            let mut snapshot = self.state.snapshot.write().await;
            if apply_packet(&mut snapshot, packet_id, &header, payload) {
                snapshot.last_updated = Some(Utc::now());
            }

            // Notification is considered for every relevant packet, decoded
            // or not; only the two high-rate types are throttled.
            if self
                .throttle
                .admit(packet_id.is_high_frequency(), Instant::now())
            {
                let _ = self.state.updates.send(snapshot.clone());
            }
        }
    }
}

/// Merge one decoded packet into the snapshot. Returns whether anything
/// changed; a decode failure logs at debug level and changes nothing.
fn apply_packet(
    snapshot: &mut Snapshot,
    packet_id: PacketId,
    header: &PacketHeader,
    payload: &[u8],
) -> bool {
    match packet_id {
        PacketId::Session => match decode_session(payload) {
            Ok(update) => {
                apply_session(snapshot, update);
                true
            }
            Err(e) => {
                debug!("Session decode failed: {e}");
                false
            }
        },
        PacketId::LapData => match decode_lap_data(payload, header.player_car_index) {
            Ok(update) => {
                snapshot.lap = update.lap;
                if let Some(leader) = update.leader_index {
                    snapshot.session.leader_index = Some(leader);
                }
                true
            }
            Err(e) => {
                debug!("LapData decode failed: {e}");
                false
            }
        },
        PacketId::CarTelemetry => match decode_car_telemetry(payload, header.player_car_index) {
            Ok(telemetry) => {
                snapshot.telemetry = telemetry;
                true
            }
            Err(e) => {
                debug!("CarTelemetry decode failed: {e}");
                false
            }
        },
        PacketId::CarStatus => match decode_car_status(payload, header.player_car_index) {
            Ok(status) => {
                snapshot.car_status = status;
                true
            }
            Err(e) => {
                debug!("CarStatus decode failed: {e}");
                false
            }
        },
        PacketId::CarDamage => match decode_car_damage(payload, header.player_car_index) {
            Ok(update) => {
                // The sticky terminal flag survives every damage update
                snapshot.car_damage = CarDamageState {
                    tyre_wear: update.tyre_wear,
                    front_left_wing: update.front_left_wing,
                    front_right_wing: update.front_right_wing,
                    rear_wing: update.rear_wing,
                    floor: update.floor,
                    diffuser: update.diffuser,
                    sidepod: update.sidepod,
                    has_damage: update.has_damage,
                    terminal: snapshot.car_damage.terminal,
                };
                true
            }
            Err(e) => {
                debug!("CarDamage decode failed: {e}");
                false
            }
        },
        PacketId::Event => match decode_event(payload) {
            Ok(update) => apply_event(snapshot, update, header.player_car_index),
            Err(e) => {
                debug!("Event decode failed: {e}");
                false
            }
        },
        PacketId::Participants => match decode_participants(payload) {
            Ok(names) => {
                let changed = !names.is_empty();
                for (car_index, name) in names {
                    snapshot.participants.set_name(car_index, name);
                }
                changed
            }
            Err(e) => {
                debug!("Participants decode failed: {e}");
                false
            }
        },
        _ => false,
    }
}

fn apply_session(snapshot: &mut Snapshot, update: SessionUpdate) {
    // Promote to Active while a known session type has time on the clock;
    // demote Active to Ended once it no longer does. Event-driven
    // transitions (SSTA/SEND/CHQF) are applied when those events arrive and
    // take precedence by running later.
    let status = snapshot.events.session_status;
    let running = update.session_type != 0 && update.session_time_left > 0;
    snapshot.events.session_status = if running {
        match status {
            SessionStatus::Unknown | SessionStatus::Inactive => SessionStatus::Active,
            other => other,
        }
    } else if status == SessionStatus::Active {
        SessionStatus::Ended
    } else {
        status
    };

    // Leader is derived from LapData and absent here; carry it over
    snapshot.session = SessionState {
        weather: update.weather,
        track_temperature: update.track_temperature,
        air_temperature: update.air_temperature,
        total_laps: update.total_laps,
        track_length: update.track_length,
        session_type: update.session_type,
        track_id: update.track_id,
        session_time_left: update.session_time_left,
        safety_car_status: update.safety_car_status,
        leader_index: snapshot.session.leader_index,
    };

    if let Some(forecast) = update.forecast {
        snapshot.forecast = forecast;
    }
}

/// Returns whether the event changed any state.
fn apply_event(snapshot: &mut Snapshot, update: EventUpdate, focus: u8) -> bool {
    match update {
        EventUpdate::StartLights { count } => {
            snapshot.events.start_lights = count;
            true
        }
        EventUpdate::LightsOut => {
            snapshot.events.start_lights = 0;
            true
        }
        EventUpdate::SessionStarted => {
            snapshot.events.session_status = SessionStatus::Started;
            true
        }
        EventUpdate::SessionEnded => {
            snapshot.events.session_status = SessionStatus::Ended;
            true
        }
        EventUpdate::ChequeredFlag => {
            snapshot.events.session_status = SessionStatus::ChequeredFlag;
            true
        }
        EventUpdate::FastestLap {
            car_index,
            lap_time,
        } => {
            snapshot.fastest_lap = FastestLapRecord {
                car_index,
                lap_time,
            };
            true
        }
        EventUpdate::Retirement { car_index, reason } => {
            if car_index == focus && reason == RETIREMENT_REASON_TERMINAL_DAMAGE {
                snapshot.car_damage.terminal = true;
                true
            } else {
                false
            }
        }
        EventUpdate::Unrecognised => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use f1t_codec::wire;

    fn header_bytes(packet_id: u8, player_car_index: u8) -> Vec<u8> {
        let mut buf = Vec::with_capacity(HEADER_SIZE);
        buf.extend_from_slice(&2025u16.to_le_bytes());
        buf.extend_from_slice(&[25, 1, 0, 1, packet_id]);
        buf.extend_from_slice(&1u64.to_le_bytes());
        buf.extend_from_slice(&0f32.to_le_bytes());
        buf.extend_from_slice(&0u32.to_le_bytes());
        buf.extend_from_slice(&0u32.to_le_bytes());
        buf.push(player_car_index);
        buf.push(255);
        buf
    }

    fn datagram(packet_id: PacketId, player_car_index: u8, payload: &[u8]) -> Vec<u8> {
        let mut data = header_bytes(packet_id as u8, player_car_index);
        data.extend_from_slice(payload);
        if let Some(expected) = packet_id.expected_size() {
            data.resize(expected, 0);
        }
        data
    }

    fn event_datagram(code: &[u8; 4], detail: &[u8]) -> Vec<u8> {
        let mut payload = code.to_vec();
        payload.extend_from_slice(detail);
        datagram(PacketId::Event, 0, &payload)
    }

    fn telemetry_datagram(focus: u8, speed: u16) -> Vec<u8> {
        let mut payload = vec![0u8; wire::MAX_CARS * wire::CAR_TELEMETRY_SIZE + 3];
        let at = focus as usize * wire::CAR_TELEMETRY_SIZE;
        payload[at..at + 2].copy_from_slice(&speed.to_le_bytes());
        datagram(PacketId::CarTelemetry, focus, &payload)
    }

    fn damage_datagram(focus: u8, rear_wing: u8) -> Vec<u8> {
        let mut payload = vec![0u8; wire::MAX_CARS * wire::CAR_DAMAGE_SIZE];
        payload[focus as usize * wire::CAR_DAMAGE_SIZE + 30] = rear_wing;
        datagram(PacketId::CarDamage, focus, &payload)
    }

    fn engine() -> (Engine, AppState) {
        let state = AppState::new();
        (Engine::new(state.clone(), None), state)
    }

    #[tokio::test]
    async fn test_truncated_datagram_is_dropped() {
        let (mut engine, state) = engine();
        engine.process_datagram(&[0u8; 10]).await;
        assert_eq!(state.snapshot().await, Snapshot::default());
    }

    #[tokio::test]
    async fn test_size_mismatch_is_dropped_before_decoding() {
        let (mut engine, state) = engine();
        let mut data = telemetry_datagram(0, 250);
        data.pop();
        engine.process_datagram(&data).await;
        assert_eq!(state.snapshot().await.telemetry.speed_kph, 0);
        assert!(state.snapshot().await.last_updated.is_none());
    }

    #[tokio::test]
    async fn test_telemetry_merge() {
        let (mut engine, state) = engine();
        engine.process_datagram(&telemetry_datagram(5, 301)).await;
        let snapshot = state.snapshot().await;
        assert_eq!(snapshot.telemetry.speed_kph, 301);
        assert!(snapshot.last_updated.is_some());
    }

    #[tokio::test]
    async fn test_repeated_decode_is_idempotent() {
        let (mut engine, state) = engine();
        let data = telemetry_datagram(3, 287);
        engine.process_datagram(&data).await;
        let first = state.snapshot().await.telemetry.clone();
        engine.process_datagram(&data).await;
        assert_eq!(state.snapshot().await.telemetry, first);
    }

    #[tokio::test]
    async fn test_unknown_packet_id_is_ignored() {
        let (mut engine, state) = engine();
        let data = header_bytes(200, 0);
        engine.process_datagram(&data).await;
        assert_eq!(state.snapshot().await, Snapshot::default());
    }

    #[tokio::test]
    async fn test_terminal_flag_is_sticky_across_damage_packets() {
        let (mut engine, state) = engine();

        // Focus car 4 retires with terminal damage
        engine
            .process_datagram(&{
                let mut payload = b"RTMT".to_vec();
                payload.extend_from_slice(&[4, RETIREMENT_REASON_TERMINAL_DAMAGE]);
                datagram(PacketId::Event, 4, &payload)
            })
            .await;
        assert!(state.snapshot().await.car_damage.terminal);

        // A clean damage packet afterwards must not clear it
        engine.process_datagram(&damage_datagram(4, 0)).await;
        let snapshot = state.snapshot().await;
        assert!(snapshot.car_damage.terminal);
        assert!(!snapshot.car_damage.has_damage);
    }

    #[tokio::test]
    async fn test_retirement_of_other_car_does_not_mark_terminal() {
        let (mut engine, state) = engine();
        let mut payload = b"RTMT".to_vec();
        payload.extend_from_slice(&[9, RETIREMENT_REASON_TERMINAL_DAMAGE]);
        engine
            .process_datagram(&datagram(PacketId::Event, 4, &payload))
            .await;
        assert!(!state.snapshot().await.car_damage.terminal);
    }

    #[tokio::test]
    async fn test_damage_merge_preserves_terminal_and_derives_has_damage() {
        let (mut engine, state) = engine();
        engine.process_datagram(&damage_datagram(0, 25)).await;
        let snapshot = state.snapshot().await;
        assert_eq!(snapshot.car_damage.rear_wing, 25);
        assert!(snapshot.car_damage.has_damage);
        assert!(!snapshot.car_damage.terminal);
    }

    #[tokio::test]
    async fn test_telemetry_is_throttled_events_are_not() {
        let (mut engine, state) = engine();
        let mut rx = state.subscribe();

        // Two telemetry packets back to back: only the first notifies
        engine.process_datagram(&telemetry_datagram(0, 100)).await;
        engine.process_datagram(&telemetry_datagram(0, 101)).await;
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());

        // Two events back to back: both notify
        engine.process_datagram(&event_datagram(b"STLG", &[1])).await;
        engine.process_datagram(&event_datagram(b"STLG", &[2])).await;
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_ok());
    }

    #[tokio::test]
    async fn test_session_status_lifecycle() {
        let (mut engine, state) = engine();

        // Session packet with a race under way promotes Unknown -> Active
        let mut payload = vec![0u8; 724];
        payload[6] = 10; // session type: race
        payload[9..11].copy_from_slice(&1800u16.to_le_bytes());
        engine
            .process_datagram(&datagram(PacketId::Session, 0, &payload))
            .await;
        assert_eq!(
            state.snapshot().await.events.session_status,
            SessionStatus::Active
        );

        // Chequered flag event takes precedence
        engine.process_datagram(&event_datagram(b"CHQF", &[])).await;
        assert_eq!(
            state.snapshot().await.events.session_status,
            SessionStatus::ChequeredFlag
        );

        // Another running session packet does not demote it
        engine
            .process_datagram(&datagram(PacketId::Session, 0, &payload))
            .await;
        assert_eq!(
            state.snapshot().await.events.session_status,
            SessionStatus::ChequeredFlag
        );
    }

    #[tokio::test]
    async fn test_session_expiry_demotes_active_to_ended() {
        let (mut engine, state) = engine();

        let mut running = vec![0u8; 724];
        running[6] = 10;
        running[9..11].copy_from_slice(&600u16.to_le_bytes());
        engine
            .process_datagram(&datagram(PacketId::Session, 0, &running))
            .await;
        assert_eq!(
            state.snapshot().await.events.session_status,
            SessionStatus::Active
        );

        let mut expired = vec![0u8; 724];
        expired[6] = 10; // time left zero
        engine
            .process_datagram(&datagram(PacketId::Session, 0, &expired))
            .await;
        assert_eq!(
            state.snapshot().await.events.session_status,
            SessionStatus::Ended
        );
    }

    #[tokio::test]
    async fn test_lap_data_sets_leader_and_session_keeps_it() {
        let (mut engine, state) = engine();

        let mut payload = vec![0u8; wire::MAX_CARS * wire::LAP_DATA_SIZE + 2];
        for i in 0..wire::MAX_CARS {
            payload[i * wire::LAP_DATA_SIZE + 32] = i as u8 + 2;
        }
        payload[3 * wire::LAP_DATA_SIZE + 32] = 1; // car 3 holds P1
        engine
            .process_datagram(&datagram(PacketId::LapData, 0, &payload))
            .await;
        assert_eq!(state.snapshot().await.session.leader_index, Some(3));

        let session = vec![0u8; 724];
        engine
            .process_datagram(&datagram(PacketId::Session, 0, &session))
            .await;
        assert_eq!(state.snapshot().await.session.leader_index, Some(3));
    }

    #[tokio::test]
    async fn test_fastest_lap_event() {
        let (mut engine, state) = engine();
        let mut detail = vec![11u8];
        detail.extend_from_slice(&69.123f32.to_le_bytes());
        engine.process_datagram(&event_datagram(b"FTLP", &detail)).await;
        let snapshot = state.snapshot().await;
        assert_eq!(snapshot.fastest_lap.car_index, 11);
        assert_eq!(snapshot.fastest_lap.lap_time, 69.123);
    }

    #[tokio::test]
    async fn test_participants_merge() {
        let (mut engine, state) = engine();
        let mut payload = vec![2u8];
        for name in [b"RUSSELL\0" as &[u8], b"ANTONELLI\0"] {
            let mut entry = [0u8; wire::PARTICIPANT_SIZE];
            entry[7..7 + name.len()].copy_from_slice(name);
            payload.extend_from_slice(&entry);
        }
        engine
            .process_datagram(&datagram(PacketId::Participants, 0, &payload))
            .await;
        let snapshot = state.snapshot().await;
        assert_eq!(snapshot.participants.name(0), Some("RUSSELL"));
        assert_eq!(snapshot.participants.name(1), Some("ANTONELLI"));
    }

    #[tokio::test]
    async fn test_set_forwarder_swaps_relay_destination() {
        use crate::forward::Forwarder;
        use std::time::Duration;

        let (mut engine, _state) = engine();
        let dest = tokio::net::UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = dest.local_addr().unwrap().port();
        engine.set_forwarder(Some(Forwarder::new("127.0.0.1", port).unwrap()));

        let data = telemetry_datagram(0, 180);
        engine.process_datagram(&data).await;

        let mut buf = vec![0u8; 2048];
        let (len, _) = tokio::time::timeout(Duration::from_secs(2), dest.recv_from(&mut buf))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(&buf[..len], data.as_slice());

        // Disabling forwarding stops the relay without touching decoding
        engine.set_forwarder(None);
        engine.process_datagram(&telemetry_datagram(0, 181)).await;
        assert_eq!(engine.state.snapshot().await.telemetry.speed_kph, 181);
    }

    #[tokio::test]
    async fn test_out_of_range_focus_leaves_lap_state() {
        let (mut engine, state) = engine();

        // Seed lap state with focus car 0
        let mut payload = vec![0u8; wire::MAX_CARS * wire::LAP_DATA_SIZE + 2];
        payload[0..4].copy_from_slice(&61_234u32.to_le_bytes());
        engine
            .process_datagram(&datagram(PacketId::LapData, 0, &payload))
            .await;
        assert_eq!(state.snapshot().await.lap.last_lap_time_ms, 61_234);

        // A LapData-shaped datagram decoded standalone for a focus index
        // past the payload must leave the stored state untouched. Use the
        // engine's decoder contract directly: payload for 10 cars only.
        let short_payload = vec![0u8; 10 * wire::LAP_DATA_SIZE];
        let header = PacketHeader::decode(&header_bytes(PacketId::LapData as u8, 21)).unwrap();
        let mut snapshot = state.snapshot.write().await;
        let changed = apply_packet(&mut snapshot, PacketId::LapData, &header, &short_payload);
        assert!(!changed);
        assert_eq!(snapshot.lap.last_lap_time_ms, 61_234);
    }
}
