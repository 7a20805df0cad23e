//! Wire format catalog
//!
//! Static facts about the F1 25 UDP protocol: packet ids, total datagram
//! sizes used for the sanity check, the common header size, and the
//! fixed per-car record sizes inside multi-car payloads.

/// Common header length in bytes.
pub const HEADER_SIZE: usize = 29;

/// Maximum number of cars carried in any multi-car payload.
pub const MAX_CARS: usize = 22;

/// Per-car record size in the LapData payload.
pub const LAP_DATA_SIZE: usize = 57;

/// Per-car record size in the CarTelemetry payload.
pub const CAR_TELEMETRY_SIZE: usize = 60;

/// Per-car record size in the CarStatus payload.
pub const CAR_STATUS_SIZE: usize = 55;

/// Per-car record size in the CarDamage payload.
pub const CAR_DAMAGE_SIZE: usize = 46;

/// Per-entry record size in the Participants payload.
pub const PARTICIPANT_SIZE: usize = 57;

/// Marshal zone record size and count in the Session payload. The zone
/// contents are not decoded; the region only locates the bytes after it.
pub const MARSHAL_ZONE_SIZE: usize = 5;
pub const NUM_MARSHAL_ZONES: usize = 21;

/// Weather forecast sample size in the Session payload.
pub const FORECAST_SAMPLE_SIZE: usize = 8;

/// Packet type identifiers in the F1 25 UDP protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PacketId {
    Motion = 0,
    Session = 1,
    LapData = 2,
    Event = 3,
    Participants = 4,
    CarSetups = 5,
    CarTelemetry = 6,
    CarStatus = 7,
    FinalClassification = 8,
    LobbyInfo = 9,
    CarDamage = 10,
    SessionHistory = 11,
    TyreSets = 12,
    MotionEx = 13,
    TimeTrial = 14,
    LapPositions = 15,
}

impl PacketId {
    /// Map a header id byte to a known packet type. Unknown ids (future
    /// protocol additions) return None and are ignored by the dispatcher.
    pub fn from_u8(id: u8) -> Option<Self> {
        match id {
            0 => Some(PacketId::Motion),
            1 => Some(PacketId::Session),
            2 => Some(PacketId::LapData),
            3 => Some(PacketId::Event),
            4 => Some(PacketId::Participants),
            5 => Some(PacketId::CarSetups),
            6 => Some(PacketId::CarTelemetry),
            7 => Some(PacketId::CarStatus),
            8 => Some(PacketId::FinalClassification),
            9 => Some(PacketId::LobbyInfo),
            10 => Some(PacketId::CarDamage),
            11 => Some(PacketId::SessionHistory),
            12 => Some(PacketId::TyreSets),
            13 => Some(PacketId::MotionEx),
            14 => Some(PacketId::TimeTrial),
            15 => Some(PacketId::LapPositions),
            _ => None,
        }
    }

    /// Total datagram size (header included) for ids with a known fixed
    /// size. Ids without an entry skip the size sanity check.
    pub fn expected_size(self) -> Option<usize> {
        match self {
            PacketId::Motion => Some(1349),
            PacketId::Session => Some(753),
            PacketId::LapData => Some(1285),
            PacketId::Event => Some(45),
            PacketId::Participants => Some(1284),
            PacketId::CarSetups => Some(1133),
            PacketId::CarTelemetry => Some(1352),
            PacketId::CarStatus => Some(1239),
            PacketId::FinalClassification => Some(1042),
            PacketId::LobbyInfo => Some(954),
            PacketId::CarDamage => Some(1041),
            PacketId::SessionHistory => Some(1460),
            PacketId::TyreSets => Some(231),
            PacketId::MotionEx => Some(273),
            PacketId::TimeTrial => None,
            PacketId::LapPositions => None,
        }
    }

    /// Packet types that feed the snapshot and trigger change notifications.
    pub fn is_relevant(self) -> bool {
        matches!(
            self,
            PacketId::Session
                | PacketId::LapData
                | PacketId::Event
                | PacketId::Participants
                | PacketId::CarTelemetry
                | PacketId::CarStatus
                | PacketId::CarDamage
        )
    }

    /// The two ~60 Hz packet types whose notifications are rate-limited.
    pub fn is_high_frequency(self) -> bool {
        matches!(self, PacketId::CarTelemetry | PacketId::LapData)
    }
}
