//! Database module - SQLite connection and migrations
//!
//! One connection guarded by a mutex; all stores share it through an
//! `Arc<Database>`, which serializes writes and preserves the
//! registry's fingerprint-uniqueness invariant. Schema creation is an
//! explicit, idempotent migration step - never run it implicitly from
//! constructors.

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use parking_lot::{Mutex, MutexGuard};
use rusqlite::Connection;

use super::error::StoreError;

/// Shared database handle
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) the database file at `path`
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        log::info!("opened database at {:?}", path);
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory database, used by tests
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Apply the schema. Idempotent - safe to re-run on every start.
    pub fn run_migrations(&self) -> Result<(), StoreError> {
        self.conn.lock().execute_batch(SCHEMA_SQL)?;
        log::info!("database schema applied");
        Ok(())
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock()
    }
}

/// Encode a timestamp for storage. Fixed millisecond precision keeps
/// lexicographic and chronological order identical, which the
/// newest-first queries rely on.
pub(crate) fn encode_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Decode a stored timestamp
pub(crate) fn decode_ts(raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| StoreError::Corrupted(format!("bad timestamp {:?}: {}", raw, e)))
}

/// Database schema SQL
const SCHEMA_SQL: &str = r#"
-- Analyses, one row per distinct document content
CREATE TABLE IF NOT EXISTS analyses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    content_fingerprint TEXT NOT NULL UNIQUE,
    actor TEXT NOT NULL,
    role TEXT NOT NULL,
    document_type TEXT NOT NULL,
    overall_score INTEGER NOT NULL,
    risk_level TEXT NOT NULL,
    confidence REAL NOT NULL,
    dimension_scores TEXT NOT NULL,
    critical_dimensions TEXT NOT NULL,
    recommendations TEXT NOT NULL,
    model_version TEXT NOT NULL,
    duration_ms INTEGER NOT NULL,
    created_at TEXT NOT NULL
);

-- Activity log, append-only
CREATE TABLE IF NOT EXISTS activities (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    created_at TEXT NOT NULL,
    actor TEXT NOT NULL,
    kind TEXT NOT NULL,
    target TEXT,
    outcome TEXT NOT NULL,
    details TEXT,
    result TEXT,
    duration_ms INTEGER NOT NULL
);

-- Sensitive administrative changes, append-only
CREATE TABLE IF NOT EXISTS sensitive_changes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    created_at TEXT NOT NULL,
    actor TEXT NOT NULL,
    kind TEXT NOT NULL,
    description TEXT NOT NULL,
    before_value TEXT,
    after_value TEXT,
    reason TEXT
);

-- Alerts
CREATE TABLE IF NOT EXISTS alerts (
    alert_id TEXT PRIMARY KEY,
    created_at TEXT NOT NULL,
    level TEXT NOT NULL,
    kind TEXT NOT NULL,
    description TEXT NOT NULL,
    affected_actor TEXT,
    resolved INTEGER NOT NULL DEFAULT 0
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_analyses_actor_time ON analyses(actor, created_at);
CREATE INDEX IF NOT EXISTS idx_analyses_level ON analyses(risk_level);
CREATE INDEX IF NOT EXISTS idx_activities_actor_time ON activities(actor, created_at);
CREATE INDEX IF NOT EXISTS idx_activities_kind ON activities(kind);
CREATE INDEX IF NOT EXISTS idx_changes_actor ON sensitive_changes(actor, created_at);
CREATE INDEX IF NOT EXISTS idx_alerts_resolved ON alerts(resolved);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("integrity.db");
        let db = Database::open(&path).unwrap();
        db.run_migrations().unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_migrations_are_idempotent() {
        let db = Database::open_in_memory().unwrap();
        db.run_migrations().unwrap();
        db.run_migrations().unwrap();
    }

    #[test]
    fn test_timestamp_round_trip() {
        let now = Utc::now();
        let decoded = decode_ts(&encode_ts(now)).unwrap();
        assert_eq!(decoded.timestamp_millis(), now.timestamp_millis());
    }

    #[test]
    fn test_bad_timestamp_is_corrupted() {
        assert!(matches!(
            decode_ts("yesterday"),
            Err(StoreError::Corrupted(_))
        ));
    }
}
