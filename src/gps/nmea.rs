//! Minimal NMEA 0183 handling for the two sentences the receiver is told to
//! emit (RMC and GGA). Checksums are stripped, not verified.

use crate::models::FixSnapshot;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// XOR checksum over the characters between `$` and `*`.
pub fn checksum(body: &str) -> u8 {
    body.bytes().fold(0u8, |acc, b| acc ^ b)
}

/// Frame a command body as a full sentence: `$BODY*CS\r\n`.
pub fn frame_command(body: &str) -> String {
    format!("${}*{:02X}\r\n", body, checksum(body))
}

/// Split a sentence into its comma-separated fields, without `$` and `*CS`.
fn fields(sentence: &str) -> Vec<&str> {
    let body = sentence.trim().trim_start_matches('$');
    let body = match body.find('*') {
        Some(idx) => &body[..idx],
        None => body,
    };
    body.split(',').collect()
}

fn parse_f64(field: Option<&&str>) -> Option<f64> {
    field.and_then(|s| s.trim().parse::<f64>().ok())
}

fn parse_i64(field: Option<&&str>) -> Option<i64> {
    field.and_then(|s| s.trim().parse::<i64>().ok())
}

/// `hhmmss(.sss)` → time of day.
fn parse_time(field: &str) -> Option<NaiveTime> {
    if field.len() < 6 {
        return None;
    }
    let h = field.get(0..2)?.parse::<u32>().ok()?;
    let m = field.get(2..4)?.parse::<u32>().ok()?;
    let s = field.get(4..6)?.parse::<u32>().ok()?;
    NaiveTime::from_hms_opt(h, m, s)
}

/// `ddmmyy` → date. Two-digit years below 80 are 20xx.
fn parse_date(field: &str) -> Option<NaiveDate> {
    if field.len() != 6 {
        return None;
    }
    let d = field.get(0..2)?.parse::<u32>().ok()?;
    let m = field.get(2..4)?.parse::<u32>().ok()?;
    let y = field.get(4..6)?.parse::<i32>().ok()?;
    let year = if y < 80 { 2000 + y } else { 1900 + y };
    NaiveDate::from_ymd_opt(year, m, d)
}

/// `(d)ddmm.mmmm` + hemisphere → signed decimal degrees.
pub fn parse_coordinate(value: &str, hemisphere: &str) -> Option<f64> {
    let value = value.trim();
    let dot = value.find('.').unwrap_or(value.len());
    if dot < 2 {
        return None;
    }
    let degrees = value.get(..dot - 2)?.parse::<f64>().unwrap_or(0.0);
    let minutes = value.get(dot - 2..)?.parse::<f64>().ok()?;
    let decimal = degrees + minutes / 60.0;

    match hemisphere.trim() {
        "N" | "E" => Some(decimal),
        "S" | "W" => Some(-decimal),
        _ => None,
    }
}

/// Applies sentences to a running snapshot, remembering the last RMC date.
#[derive(Debug, Default)]
pub struct NmeaState {
    last_date: Option<NaiveDate>,
}

impl NmeaState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update `fix` from one sentence. Returns `false` for sentences that
    /// carry no position data (they still become the latest raw sentence).
    pub fn apply(&mut self, fix: &mut FixSnapshot, sentence: &str) -> bool {
        let sentence = sentence.trim();
        fix.nmea_sentence = Some(sentence.to_string());

        let f = fields(sentence);
        let Some(kind) = f.first() else {
            return false;
        };

        // Talker id (GP, GN, GL, ...) is ignored.
        match kind.get(2..) {
            Some("GGA") => {
                self.apply_gga(fix, &f);
                true
            }
            Some("RMC") => {
                self.apply_rmc(fix, &f);
                true
            }
            _ => false,
        }
    }

    fn timestamp(&self, time: Option<NaiveTime>) -> Option<NaiveDateTime> {
        let time = time?;
        let date = self.last_date.unwrap_or_else(|| Utc::now().date_naive());
        Some(NaiveDateTime::new(date, time))
    }

    // $GPGGA,time,lat,N,lon,E,quality,sats,hdop,alt,M,geoid,M,...
    fn apply_gga(&mut self, fix: &mut FixSnapshot, f: &[&str]) {
        if let Some(ts) = self.timestamp(f.get(1).and_then(|t| parse_time(t))) {
            fix.timestamp_utc = Some(ts);
        }

        let quality = parse_i64(f.get(6)).unwrap_or(0);
        fix.fix_quality = Some(quality);

        if quality == 0 {
            fix.has_fix = false;
            return;
        }
        fix.has_fix = true;

        if let (Some(lat), Some(ns)) = (f.get(2), f.get(3)) {
            fix.latitude = parse_coordinate(lat, ns).or(fix.latitude);
        }
        if let (Some(lon), Some(ew)) = (f.get(4), f.get(5)) {
            fix.longitude = parse_coordinate(lon, ew).or(fix.longitude);
        }
        fix.satellites = parse_i64(f.get(7)).or(fix.satellites);
        fix.horizontal_dilution = parse_f64(f.get(8)).or(fix.horizontal_dilution);
        fix.altitude_m = parse_f64(f.get(9)).or(fix.altitude_m);
        fix.height_geoid = parse_f64(f.get(11)).or(fix.height_geoid);
    }

    // $GPRMC,time,status,lat,N,lon,E,speed,track,date,...
    fn apply_rmc(&mut self, fix: &mut FixSnapshot, f: &[&str]) {
        if let Some(date) = f.get(9).and_then(|d| parse_date(d)) {
            self.last_date = Some(date);
        }
        if let Some(ts) = self.timestamp(f.get(1).and_then(|t| parse_time(t))) {
            fix.timestamp_utc = Some(ts);
        }

        match f.get(2).map(|s| s.trim()) {
            Some("A") => fix.has_fix = true,
            _ => {
                fix.has_fix = false;
                return;
            }
        }

        if let (Some(lat), Some(ns)) = (f.get(3), f.get(4)) {
            fix.latitude = parse_coordinate(lat, ns).or(fix.latitude);
        }
        if let (Some(lon), Some(ew)) = (f.get(5), f.get(6)) {
            fix.longitude = parse_coordinate(lon, ew).or(fix.longitude);
        }
        fix.speed_knots = parse_f64(f.get(7)).or(fix.speed_knots);
        fix.track_angle_deg = parse_f64(f.get(8)).or(fix.track_angle_deg);
    }
}
