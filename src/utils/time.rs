//! Timestamp helpers. Everything persisted uses `YYYY-MM-DD HH:MM:SS`.

use chrono::{Local, NaiveDateTime};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Wall-clock local time, used for sessions and lifecycle events.
pub fn now_local() -> NaiveDateTime {
    Local::now().naive_local()
}

pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).ok()
}
