//! Alerting
//!
//! Append-only alert stream with one mutable bit: the resolved flag,
//! toggled exclusively through `resolve`. Raising an alert is
//! independent of every other component - it succeeds or fails on its
//! own write only.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::db::{decode_ts, encode_ts, Database};
use super::error::StoreError;

// ============================================================================
// TYPES
// ============================================================================

/// Alert severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlertLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl AlertLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::Low => "LOW",
            AlertLevel::Medium => "MEDIUM",
            AlertLevel::High => "HIGH",
            AlertLevel::Critical => "CRITICAL",
        }
    }

    pub fn severity_level(&self) -> u8 {
        match self {
            AlertLevel::Low => 1,
            AlertLevel::Medium => 2,
            AlertLevel::High => 3,
            AlertLevel::Critical => 4,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "LOW" => Some(AlertLevel::Low),
            "MEDIUM" => Some(AlertLevel::Medium),
            "HIGH" => Some(AlertLevel::High),
            "CRITICAL" => Some(AlertLevel::Critical),
            _ => None,
        }
    }
}

impl std::fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A raised alert
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub level: AlertLevel,
    pub kind: String,
    pub description: String,
    pub affected_actor: Option<String>,
    pub resolved: bool,
}

/// Query filters for `query`
#[derive(Debug, Clone, Default)]
pub struct AlertFilter<'a> {
    pub resolved: Option<bool>,
    pub level: Option<AlertLevel>,
    pub kind: Option<&'a str>,
    pub limit: Option<usize>,
}

const DEFAULT_LIMIT: usize = 50;

// ============================================================================
// STORE
// ============================================================================

pub struct AlertStore {
    db: Arc<Database>,
}

impl AlertStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Raise a new alert. Append-only; returns the alert id.
    pub fn raise(
        &self,
        level: AlertLevel,
        kind: &str,
        description: &str,
        affected_actor: Option<&str>,
    ) -> Result<Uuid, StoreError> {
        let conn = self.db.lock();
        let id = insert_alert(&conn, level, kind, description, affected_actor)?;
        log::warn!("alert raised: {} {} ({})", level, kind, id);
        Ok(id)
    }

    /// List alerts, newest first
    pub fn query(&self, filter: &AlertFilter<'_>) -> Result<Vec<Alert>, StoreError> {
        let mut sql = String::from(
            "SELECT alert_id, created_at, level, kind, description, affected_actor, resolved \
             FROM alerts WHERE 1=1",
        );
        let mut bound: Vec<String> = Vec::new();

        if let Some(resolved) = filter.resolved {
            sql.push_str(" AND resolved = ?");
            bound.push(if resolved { "1" } else { "0" }.to_string());
        }
        if let Some(level) = filter.level {
            sql.push_str(" AND level = ?");
            bound.push(level.as_str().to_string());
        }
        if let Some(kind) = filter.kind {
            sql.push_str(" AND kind = ?");
            bound.push(kind.to_string());
        }
        sql.push_str(&format!(
            " ORDER BY created_at DESC, alert_id DESC LIMIT {}",
            filter.limit.unwrap_or(DEFAULT_LIMIT)
        ));

        let conn = self.db.lock();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(bound.iter()), |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, Option<String>>(5)?,
                row.get::<_, i64>(6)?,
            ))
        })?;

        let mut alerts = Vec::new();
        for row in rows {
            let (id, created_at, level, kind, description, affected_actor, resolved) = row?;
            alerts.push(Alert {
                id: Uuid::parse_str(&id)
                    .map_err(|e| StoreError::Corrupted(format!("bad alert id {:?}: {}", id, e)))?,
                created_at: decode_ts(&created_at)?,
                level: AlertLevel::from_str(&level).ok_or_else(|| {
                    StoreError::Corrupted(format!("unknown alert level {:?}", level))
                })?,
                kind,
                description,
                affected_actor,
                resolved: resolved != 0,
            });
        }
        Ok(alerts)
    }

    /// Mark an alert resolved. Idempotent: returns true if the alert
    /// transitioned, false if it was already resolved or unknown.
    pub fn resolve(&self, id: Uuid) -> Result<bool, StoreError> {
        let conn = self.db.lock();
        let changed = conn.execute(
            "UPDATE alerts SET resolved = 1 WHERE alert_id = ?1 AND resolved = 0",
            params![id.to_string()],
        )?;
        if changed == 0 {
            log::debug!("resolve on alert {} was a no-op", id);
        }
        Ok(changed > 0)
    }
}

/// Shared insert path, also used when a sensitive change auto-raises
/// its CRITICAL alert inside the same transaction.
pub(crate) fn insert_alert(
    conn: &Connection,
    level: AlertLevel,
    kind: &str,
    description: &str,
    affected_actor: Option<&str>,
) -> Result<Uuid, rusqlite::Error> {
    let id = Uuid::new_v4();
    conn.execute(
        "INSERT INTO alerts (alert_id, created_at, level, kind, description, affected_actor, resolved)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0)",
        params![
            id.to_string(),
            encode_ts(Utc::now()),
            level.as_str(),
            kind,
            description,
            affected_actor,
        ],
    )?;
    Ok(id)
}

// ============================================================================
// TESTS
// ============================================================================
