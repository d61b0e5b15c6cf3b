use crate::models::fix::FixSnapshot;
use crate::utils::time::format_timestamp;

/// One row of the `logs` table.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionRecord {
    pub timestamp: Option<String>,
    pub code: Option<String>,
    pub sentence: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub altitude: Option<f64>,
    pub speed: Option<f64>,
    pub fix_quality: Option<i64>,
    pub satellites: Option<i64>,
    pub track_angle: Option<f64>,
    pub horizontal_dilution: Option<f64>,
    pub height_geoid: Option<f64>,
}

impl PositionRecord {
    /// Build a record from the receiver snapshot.
    /// The timestamp is the fix's own UTC time, not the wall clock.
    pub fn from_snapshot(fix: &FixSnapshot) -> Self {
        Self {
            timestamp: fix.timestamp_utc.as_ref().map(format_timestamp),
            code: fix.nmea_sentence.as_deref().and_then(sentence_code),
            sentence: fix.nmea_sentence.clone(),
            latitude: fix.latitude,
            longitude: fix.longitude,
            altitude: fix.altitude_m,
            speed: fix.speed_knots,
            fix_quality: fix.fix_quality,
            satellites: fix.satellites,
            track_angle: fix.track_angle_deg,
            horizontal_dilution: fix.horizontal_dilution,
            height_geoid: fix.height_geoid,
        }
    }
}

/// Talker/sentence identifier: everything before the first comma.
pub fn sentence_code(sentence: &str) -> Option<String> {
    if sentence.is_empty() {
        return None;
    }
    let code = match sentence.find(',') {
        Some(idx) => &sentence[..idx],
        None => sentence,
    };
    Some(code.to_string())
}
