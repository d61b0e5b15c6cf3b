//! Unified application error type.
//! Every module (db, gps, core, sink, config) returns AppError so the
//! orchestrator can decide on one exit path for all failures.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Invalid sqlite3 database file at \"{path}\": {reason}")]
    InvalidStore { path: String, reason: String },

    #[error("Session {0} is already closed")]
    SessionClosed(i64),

    // ---------------------------
    // Serial transport
    // ---------------------------
    #[error("Serial error: {0}")]
    Serial(#[from] serialport::Error),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
