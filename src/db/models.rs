//! Database row models for sessions and lifecycle events.
//! Position rows map straight onto `PositionRecord`.

use crate::models::LifecycleEvent;

#[derive(Debug, Clone, PartialEq)]
pub struct SessionRow {
    pub session_id: i64,
    pub timestamp_start: Option<String>,
    pub timestamp_end: Option<String>,
}

impl SessionRow {
    pub fn is_closed(&self) -> bool {
        self.timestamp_end.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventRow {
    pub session_id: i64,
    pub timestamp: String,
    pub event: LifecycleEvent,
}
