//! Human-readable labels for the protocol's coded values
//!
//! The wire format transmits small integer codes; consumers usually want the
//! display string. Codes the game may add in future versions return `None`
//! rather than failing, so a newer sim build never breaks a reader.

/// Weather code label (Session packet).
pub fn weather_name(code: u8) -> Option<&'static str> {
    match code {
        0 => Some("Clear"),
        1 => Some("Light Cloud"),
        2 => Some("Overcast"),
        3 => Some("Light Rain"),
        4 => Some("Heavy Rain"),
        5 => Some("Storm"),
        _ => None,
    }
}

/// Safety car status label (Session packet).
pub fn safety_car_status_name(code: u8) -> Option<&'static str> {
    match code {
        0 => Some("No Safety Car"),
        1 => Some("Safety Car"),
        2 => Some("Virtual Safety Car"),
        3 => Some("Formation Lap"),
        _ => None,
    }
}

/// FIA flag label (CarStatus packet). -1 means the sim reports "unknown".
pub fn fia_flag_name(code: i8) -> Option<&'static str> {
    match code {
        -1 => Some("Unknown"),
        0 => Some("None"),
        1 => Some("Green"),
        2 => Some("Blue"),
        3 => Some("Yellow"),
        4 => Some("Red"),
        _ => None,
    }
}

/// ERS deploy mode label (CarStatus packet).
pub fn ers_deploy_mode_name(code: u8) -> Option<&'static str> {
    match code {
        0 => Some("None"),
        1 => Some("Medium"),
        2 => Some("Hotlap"),
        3 => Some("Overtake"),
        _ => None,
    }
}

/// Visual tyre compound label (CarStatus packet).
pub fn tyre_compound_name(code: u8) -> Option<&'static str> {
    match code {
        7 => Some("Inter"),
        8 => Some("Wet"),
        16 => Some("Soft"),
        17 => Some("Medium"),
        18 => Some("Hard"),
        _ => None,
    }
}

/// Session type label (Session packet).
pub fn session_type_name(code: u8) -> Option<&'static str> {
    match code {
        0 => Some("Unknown"),
        1 => Some("Practice 1"),
        2 => Some("Practice 2"),
        3 => Some("Practice 3"),
        4 => Some("Short Practice"),
        5 => Some("Qualifying 1"),
        6 => Some("Qualifying 2"),
        7 => Some("Qualifying 3"),
        8 => Some("Short Qualifying"),
        9 => Some("One-Shot Qualifying"),
        10 => Some("Race"),
        11 => Some("Race 2"),
        12 => Some("Race 3"),
        13 => Some("Time Trial"),
        _ => None,
    }
}

/// Track name for a track id (Session packet, 2025 id table).
pub fn track_name(track_id: i8) -> Option<&'static str> {
    match track_id {
        0 => Some("Melbourne"),
        1 => Some("Paul Ricard"),
        2 => Some("Shanghai"),
        3 => Some("Sakhir (Bahrain)"),
        4 => Some("Catalunya"),
        5 => Some("Monaco"),
        6 => Some("Montreal"),
        7 => Some("Silverstone"),
        8 => Some("Hockenheim"),
        9 => Some("Hungaroring"),
        10 => Some("Spa"),
        11 => Some("Monza"),
        12 => Some("Singapore"),
        13 => Some("Suzuka"),
        14 => Some("Abu Dhabi"),
        15 => Some("Texas"),
        16 => Some("Brazil"),
        17 => Some("Austria"),
        18 => Some("Sochi"),
        19 => Some("Mexico"),
        20 => Some("Baku"),
        21 => Some("Sakhir Short"),
        22 => Some("Silverstone Short"),
        23 => Some("Texas Short"),
        24 => Some("Suzuka Short"),
        25 => Some("Hanoi"),
        26 => Some("Zandvoort"),
        27 => Some("Imola"),
        28 => Some("Portimao"),
        29 => Some("Jeddah"),
        30 => Some("Miami"),
        31 => Some("Las Vegas"),
        32 => Some("Losail"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_names() {
        assert_eq!(weather_name(0), Some("Clear"));
        assert_eq!(weather_name(5), Some("Storm"));
        assert_eq!(weather_name(6), None);
    }

    #[test]
    fn test_fia_flag_names() {
        assert_eq!(fia_flag_name(-1), Some("Unknown"));
        assert_eq!(fia_flag_name(3), Some("Yellow"));
        assert_eq!(fia_flag_name(99), None);
    }

    #[test]
    fn test_tyre_compound_names() {
        assert_eq!(tyre_compound_name(16), Some("Soft"));
        assert_eq!(tyre_compound_name(8), Some("Wet"));
        assert_eq!(tyre_compound_name(0), None);
    }

    #[test]
    fn test_session_type_names() {
        assert_eq!(session_type_name(10), Some("Race"));
        assert_eq!(session_type_name(13), Some("Time Trial"));
        assert_eq!(session_type_name(14), None);
    }

    #[test]
    fn test_track_names() {
        assert_eq!(track_name(0), Some("Melbourne"));
        assert_eq!(track_name(32), Some("Losail"));
        assert_eq!(track_name(-1), None);
        assert_eq!(track_name(33), None);
    }
}
