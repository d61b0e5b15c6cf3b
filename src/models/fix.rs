//! Latest state reported by the GPS receiver.

use chrono::NaiveDateTime;

/// Snapshot of the receiver's most recent fix, refreshed by every poll.
///
/// Fields stay `None` until a sentence carrying them has been seen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixSnapshot {
    pub has_fix: bool,
    /// UTC date and time of the fix as reported by the receiver.
    pub timestamp_utc: Option<NaiveDateTime>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub altitude_m: Option<f64>,
    pub speed_knots: Option<f64>,
    /// 0 = no fix, 1 = GPS, 2 = DGPS ... 8 = simulation
    pub fix_quality: Option<i64>,
    pub satellites: Option<i64>,
    pub track_angle_deg: Option<f64>,
    pub horizontal_dilution: Option<f64>,
    pub height_geoid: Option<f64>,
    /// Last raw sentence read from the receiver, without line terminator.
    pub nmea_sentence: Option<String>,
}
