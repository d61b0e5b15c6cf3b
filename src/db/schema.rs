//! Store schema: creation of a fresh database and validation of an existing one.

use rusqlite::{Connection, Result};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS sessions (
        session_id      INTEGER PRIMARY KEY,
        timestamp_start TEXT,
        timestamp_end   TEXT
    );

    CREATE TABLE IF NOT EXISTS events (
        session_id INTEGER,
        timestamp  TEXT NOT NULL,
        event      TEXT NOT NULL,

        FOREIGN KEY (session_id)
            REFERENCES sessions (session_id)
                ON DELETE CASCADE
                ON UPDATE NO ACTION
    );

    CREATE TABLE IF NOT EXISTS logs (
        session_id          INTEGER,
        timestamp           TEXT,
        code                TEXT,
        sentence            TEXT,
        latitude            REAL,
        longitude           REAL,
        altitude            REAL,
        speed               REAL,
        fix_quality         INTEGER,
        satellites          INTEGER,
        track_angle         REAL,
        horizontal_dilution REAL,
        height_geoid        REAL,

        FOREIGN KEY (session_id)
            REFERENCES sessions (session_id)
                ON DELETE CASCADE
                ON UPDATE NO ACTION
    );
"#;

/// Expected tables and their columns.
pub const EXPECTED_TABLES: &[(&str, &[&str])] = &[
    ("sessions", &["session_id", "timestamp_start", "timestamp_end"]),
    ("events", &["session_id", "timestamp", "event"]),
    (
        "logs",
        &[
            "session_id",
            "timestamp",
            "code",
            "sentence",
            "latitude",
            "longitude",
            "altitude",
            "speed",
            "fix_quality",
            "satellites",
            "track_angle",
            "horizontal_dilution",
            "height_geoid",
        ],
    ),
];

pub fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
}

/// Column names of `table`, empty when the table does not exist.
pub fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info('{table}')"))?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;

    let mut out = Vec::new();
    for c in cols {
        out.push(c?);
    }
    Ok(out)
}

/// Check that every expected table exists with exactly the expected columns.
///
/// Returns `Ok(None)` when the schema matches, `Ok(Some(reason))` otherwise.
/// SQLite errors (e.g. the file is not a database) are returned as `Err`.
pub fn schema_mismatch(conn: &Connection) -> Result<Option<String>> {
    for (table, expected) in EXPECTED_TABLES {
        let columns = table_columns(conn, table)?;

        if columns.is_empty() {
            return Ok(Some(format!("missing table '{table}'")));
        }

        for col in expected.iter() {
            if !columns.iter().any(|c| c == col) {
                return Ok(Some(format!("table '{table}' has no column '{col}'")));
            }
        }

        if let Some(extra) = columns.iter().find(|c| !expected.contains(&c.as_str())) {
            return Ok(Some(format!("table '{table}' has unexpected column '{extra}'")));
        }
    }
    Ok(None)
}
