//! Session-scoped SQLite store.
//!
//! Every write commits immediately: the logger runs unattended for days and
//! may lose power at any moment, while sample rates stay at one per second.

use crate::db::queries;
use crate::db::schema::{create_schema, schema_mismatch};
use crate::errors::{AppError, AppResult};
use crate::models::{LifecycleEvent, PositionRecord};
use crate::utils::time::{format_timestamp, now_local};
use chrono::NaiveDateTime;
use rusqlite::{Connection, OpenFlags, params};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct SessionStore {
    conn: Connection,
    path: PathBuf,
}

fn connect(path: &Path) -> rusqlite::Result<Connection> {
    let conn = Connection::open(path)?;
    conn.pragma_update(None, "foreign_keys", true)?;
    Ok(conn)
}

/// Replace whatever is at `path` with an empty store.
fn create(path: &Path) -> AppResult<()> {
    if path.exists() {
        fs::remove_file(path)?;
    }

    let conn = Connection::open(path)?;
    create_schema(&conn)?;
    conn.close().map_err(|(_, e)| AppError::Db(e))?;
    Ok(())
}

/// Validate an existing file without touching it.
fn validate(path: &Path) -> AppResult<()> {
    let invalid = |reason: String| AppError::InvalidStore {
        path: path.display().to_string(),
        reason,
    };

    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .map_err(|e| invalid(e.to_string()))?;

    match schema_mismatch(&conn) {
        Ok(None) => Ok(()),
        Ok(Some(reason)) => Err(invalid(reason)),
        Err(e) => Err(invalid(e.to_string())),
    }
}

impl SessionStore {
    /// Open the store at `path`.
    ///
    /// A fresh store is created when `overwrite` is set or nothing exists at
    /// `path`; an existing file must pass schema validation.
    pub fn open(path: impl AsRef<Path>, overwrite: bool) -> AppResult<Self> {
        let path = path.as_ref();
        debug!(database_file = %path.display(), overwrite_file = overwrite, "database");

        if overwrite || !path.exists() {
            debug!("database: creating new sqlite3 database file");
            create(path)?;
        } else {
            debug!("database: opening existing sqlite3 database file");
            validate(path)?;
        }

        let conn = connect(path)?;
        debug!("database: created sqlite3 database connection successfully");

        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Insert a new session row and return its id (`max + 1`, or 1 on an empty store).
    pub fn begin_session(&mut self) -> AppResult<i64> {
        let last: Option<i64> = self
            .conn
            .query_row("SELECT MAX(session_id) FROM sessions", [], |row| row.get(0))?;
        let session_id = last.unwrap_or(0) + 1;

        self.conn.execute(
            "INSERT INTO sessions (session_id, timestamp_start, timestamp_end)
             VALUES (?1, ?2, NULL)",
            params![session_id, format_timestamp(&now_local())],
        )?;

        debug!(session_id, "database: created new session");
        Ok(session_id)
    }

    /// Append a lifecycle event. `SESSION_END` also stamps `sessions.timestamp_end`
    /// in the same transaction, and only once per session.
    pub fn record_event(
        &mut self,
        session_id: i64,
        event: LifecycleEvent,
        timestamp: NaiveDateTime,
    ) -> AppResult<()> {
        self.ensure_open(session_id)?;
        let ts = format_timestamp(&timestamp);

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO events (session_id, timestamp, event)
             VALUES (?1, ?2, ?3)",
            params![session_id, ts, event.to_db_str()],
        )?;

        if event.is_session_end() {
            let updated = tx.execute(
                "UPDATE sessions
                 SET timestamp_end = ?1
                 WHERE session_id = ?2 AND timestamp_end IS NULL",
                params![ts, session_id],
            )?;
            if updated != 1 {
                // tx rolls back on drop
                return Err(AppError::SessionClosed(session_id));
            }
        }

        tx.commit()?;
        Ok(())
    }

    /// Append one position record.
    pub fn record_sample(&mut self, session_id: i64, record: &PositionRecord) -> AppResult<()> {
        self.ensure_open(session_id)?;

        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO logs (session_id, timestamp, code, sentence, latitude, longitude,
                               altitude, speed, fix_quality, satellites, track_angle,
                               horizontal_dilution, height_geoid)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        )?;

        stmt.execute(params![
            session_id,
            record.timestamp,
            record.code,
            record.sentence,
            record.latitude,
            record.longitude,
            record.altitude,
            record.speed,
            record.fix_quality,
            record.satellites,
            record.track_angle,
            record.horizontal_dilution,
            record.height_geoid,
        ])?;

        Ok(())
    }

    /// Close the underlying connection.
    pub fn close(self) -> AppResult<()> {
        debug!(database_file = %self.path.display(), "database: closing connection");
        self.conn.close().map_err(|(_, e)| AppError::Db(e))
    }

    fn ensure_open(&self, session_id: i64) -> AppResult<()> {
        match queries::load_session(&self.conn, session_id)? {
            Some(session) if session.is_closed() => Err(AppError::SessionClosed(session_id)),
            Some(_) => Ok(()),
            None => Err(AppError::Other(format!("unknown session id {session_id}"))),
        }
    }
}
