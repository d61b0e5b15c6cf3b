use crate::db::models::{EventRow, SessionRow};
use crate::errors::{AppError, AppResult};
use crate::models::{LifecycleEvent, PositionRecord};
use rusqlite::{Connection, OptionalExtension, Result, Row};

pub fn map_session(row: &Row) -> Result<SessionRow> {
    Ok(SessionRow {
        session_id: row.get("session_id")?,
        timestamp_start: row.get("timestamp_start")?,
        timestamp_end: row.get("timestamp_end")?,
    })
}

pub fn map_event(row: &Row) -> Result<EventRow> {
    let event_str: String = row.get("event")?;
    let event = LifecycleEvent::from_db_str(&event_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::Other(format!("Invalid event: {}", event_str))),
        )
    })?;

    Ok(EventRow {
        session_id: row.get("session_id")?,
        timestamp: row.get("timestamp")?,
        event,
    })
}

pub fn map_record(row: &Row) -> Result<PositionRecord> {
    Ok(PositionRecord {
        timestamp: row.get("timestamp")?,
        code: row.get("code")?,
        sentence: row.get("sentence")?,
        latitude: row.get("latitude")?,
        longitude: row.get("longitude")?,
        altitude: row.get("altitude")?,
        speed: row.get("speed")?,
        fix_quality: row.get("fix_quality")?,
        satellites: row.get("satellites")?,
        track_angle: row.get("track_angle")?,
        horizontal_dilution: row.get("horizontal_dilution")?,
        height_geoid: row.get("height_geoid")?,
    })
}

pub fn load_session(conn: &Connection, session_id: i64) -> AppResult<Option<SessionRow>> {
    let session = conn
        .query_row(
            "SELECT session_id, timestamp_start, timestamp_end
             FROM sessions
             WHERE session_id = ?1",
            [session_id],
            map_session,
        )
        .optional()?;
    Ok(session)
}

pub fn load_sessions(conn: &Connection) -> AppResult<Vec<SessionRow>> {
    let mut stmt = conn.prepare(
        "SELECT session_id, timestamp_start, timestamp_end
         FROM sessions
         ORDER BY session_id ASC",
    )?;

    let rows = stmt.query_map([], map_session)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Events of a session in insertion order.
pub fn load_events(conn: &Connection, session_id: i64) -> AppResult<Vec<EventRow>> {
    let mut stmt = conn.prepare(
        "SELECT session_id, timestamp, event
         FROM events
         WHERE session_id = ?1
         ORDER BY rowid ASC",
    )?;

    let rows = stmt.query_map([session_id], map_event)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn load_records(conn: &Connection, session_id: i64) -> AppResult<Vec<PositionRecord>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM logs
         WHERE session_id = ?1
         ORDER BY rowid ASC",
    )?;

    let rows = stmt.query_map([session_id], map_record)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn count_records(conn: &Connection, session_id: i64) -> AppResult<i64> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM logs WHERE session_id = ?1",
        [session_id],
        |row| row.get(0),
    )?;
    Ok(count)
}
