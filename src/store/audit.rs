//! Audit Log
//!
//! Append-only record of every operation performed against the
//! system, plus the sensitive-change ledger. Entries are immutable and
//! permanent: there is no update or delete operation, and a failed
//! append always propagates - never a silent drop.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rusqlite::params;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::alerts::{insert_alert, AlertLevel};
use super::db::{decode_ts, encode_ts, Database};
use super::error::StoreError;

// ============================================================================
// ACTIVITY TYPES
// ============================================================================

/// Outcome of a logged operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityOutcome {
    Success,
    Failure,
}

impl ActivityOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityOutcome::Success => "success",
            ActivityOutcome::Failure => "failure",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "success" => Some(ActivityOutcome::Success),
            "failure" => Some(ActivityOutcome::Failure),
            _ => None,
        }
    }
}

/// An operation to log
#[derive(Debug, Clone)]
pub struct NewActivity<'a> {
    pub actor: &'a str,
    /// What was done, e.g. "analyze", "export_report"
    pub kind: &'a str,
    /// Resource the operation touched, if any
    pub target: Option<&'a str>,
    pub outcome: ActivityOutcome,
    /// Free-form structured details
    pub details: Option<serde_json::Value>,
    /// Short result summary, e.g. the risk level produced
    pub result: Option<&'a str>,
    pub duration_ms: u64,
}

/// A persisted activity entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub actor: String,
    pub kind: String,
    pub target: Option<String>,
    pub outcome: ActivityOutcome,
    pub details: Option<serde_json::Value>,
    pub result: Option<String>,
    pub duration_ms: u64,
}

/// Query filters for `query`
#[derive(Debug, Clone, Default)]
pub struct ActivityFilter<'a> {
    pub actor: Option<&'a str>,
    pub kind: Option<&'a str>,
    pub since: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

const DEFAULT_LIMIT: usize = 100;

// ============================================================================
// SENSITIVE CHANGE TYPES
// ============================================================================

/// Kinds of state-changing administrative actions.
///
/// The first three are alert-worthy by definition, not by score:
/// recording one raises a CRITICAL alert in the same transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensitiveChangeKind {
    DataDeletion,
    ResultModification,
    ConfigurationChange,
    UserManagement,
}

impl SensitiveChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SensitiveChangeKind::DataDeletion => "data_deletion",
            SensitiveChangeKind::ResultModification => "result_modification",
            SensitiveChangeKind::ConfigurationChange => "configuration_change",
            SensitiveChangeKind::UserManagement => "user_management",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "data_deletion" => Some(SensitiveChangeKind::DataDeletion),
            "result_modification" => Some(SensitiveChangeKind::ResultModification),
            "configuration_change" => Some(SensitiveChangeKind::ConfigurationChange),
            "user_management" => Some(SensitiveChangeKind::UserManagement),
            _ => None,
        }
    }

    pub fn raises_critical_alert(&self) -> bool {
        matches!(
            self,
            SensitiveChangeKind::DataDeletion
                | SensitiveChangeKind::ResultModification
                | SensitiveChangeKind::ConfigurationChange
        )
    }
}

/// A sensitive change to record
#[derive(Debug, Clone)]
pub struct NewSensitiveChange<'a> {
    pub actor: &'a str,
    pub kind: SensitiveChangeKind,
    pub description: &'a str,
    pub before: Option<&'a str>,
    pub after: Option<&'a str>,
    pub reason: Option<&'a str>,
}

/// A persisted sensitive change
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitiveChangeEntry {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub actor: String,
    pub kind: SensitiveChangeKind,
    pub description: String,
    pub before: Option<String>,
    pub after: Option<String>,
    pub reason: Option<String>,
}

/// Ids produced by recording a sensitive change
#[derive(Debug, Clone)]
pub struct SensitiveChangeReceipt {
    pub change_id: i64,
    /// Set when the change kind auto-raised a CRITICAL alert
    pub alert_id: Option<Uuid>,
}

// ============================================================================
// PER-ACTOR REPORT
// ============================================================================

/// Aggregate audit view for one actor
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub actor: String,
    pub generated_at: DateTime<Utc>,
    pub total_activities: u64,
    pub total_analyses: u64,
    pub total_sensitive_changes: u64,
    pub mean_score: f64,
    pub high_risk_analyses: u64,
    pub medium_risk_analyses: u64,
    pub low_risk_analyses: u64,
    pub recent_activities: Vec<ActivityEntry>,
    pub recent_changes: Vec<SensitiveChangeEntry>,
}

// ============================================================================
// STORE
// ============================================================================

pub struct AuditStore {
    db: Arc<Database>,
}

impl AuditStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Append one activity entry. Returns the entry id; a persistence
    /// failure propagates to the caller.
    pub fn append(&self, activity: &NewActivity<'_>) -> Result<i64, StoreError> {
        let details = activity
            .details
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let conn = self.db.lock();
        let id = conn.query_row(
            "INSERT INTO activities (created_at, actor, kind, target, outcome, details, result, duration_ms)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             RETURNING id",
            params![
                encode_ts(Utc::now()),
                activity.actor,
                activity.kind,
                activity.target,
                activity.outcome.as_str(),
                details,
                activity.result,
                activity.duration_ms as i64,
            ],
            |row| row.get::<_, i64>(0),
        )?;
        Ok(id)
    }

    /// List activity entries, newest first
    pub fn query(&self, filter: &ActivityFilter<'_>) -> Result<Vec<ActivityEntry>, StoreError> {
        let mut sql = String::from(
            "SELECT id, created_at, actor, kind, target, outcome, details, result, duration_ms \
             FROM activities WHERE 1=1",
        );
        let mut bound: Vec<String> = Vec::new();

        if let Some(actor) = filter.actor {
            sql.push_str(" AND actor = ?");
            bound.push(actor.to_string());
        }
        if let Some(kind) = filter.kind {
            sql.push_str(" AND kind = ?");
            bound.push(kind.to_string());
        }
        if let Some(since) = filter.since {
            sql.push_str(" AND created_at > ?");
            bound.push(encode_ts(since));
        }
        sql.push_str(&format!(
            " ORDER BY created_at DESC, id DESC LIMIT {}",
            filter.limit.unwrap_or(DEFAULT_LIMIT)
        ));

        let conn = self.db.lock();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(bound.iter()), |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, Option<String>>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, Option<String>>(6)?,
                row.get::<_, Option<String>>(7)?,
                row.get::<_, i64>(8)?,
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (id, created_at, actor, kind, target, outcome, details, result, duration_ms) =
                row?;
            entries.push(ActivityEntry {
                id,
                created_at: decode_ts(&created_at)?,
                actor,
                kind,
                target,
                outcome: ActivityOutcome::from_str(&outcome).ok_or_else(|| {
                    StoreError::Corrupted(format!("unknown outcome {:?}", outcome))
                })?,
                details: details
                    .map(|d| serde_json::from_str(&d))
                    .transpose()
                    .map_err(|e| StoreError::Corrupted(e.to_string()))?,
                result,
                duration_ms: duration_ms.max(0) as u64,
            });
        }
        Ok(entries)
    }

    /// Record a sensitive administrative change. Alert-worthy kinds
    /// raise their CRITICAL alert in the same transaction, so the
    /// change and its alert are stored or rejected together.
    pub fn record_sensitive_change(
        &self,
        change: &NewSensitiveChange<'_>,
    ) -> Result<SensitiveChangeReceipt, StoreError> {
        let mut conn = self.db.lock();
        let tx = conn.transaction().map_err(StoreError::from)?;

        let change_id = tx.query_row(
            "INSERT INTO sensitive_changes (created_at, actor, kind, description, before_value, after_value, reason)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING id",
            params![
                encode_ts(Utc::now()),
                change.actor,
                change.kind.as_str(),
                change.description,
                change.before,
                change.after,
                change.reason,
            ],
            |row| row.get::<_, i64>(0),
        )?;

        let alert_id = if change.kind.raises_critical_alert() {
            let description = format!(
                "Sensitive change by {}: {}",
                change.actor, change.description
            );
            Some(insert_alert(
                &tx,
                AlertLevel::Critical,
                change.kind.as_str(),
                &description,
                Some(change.actor),
            )?)
        } else {
            None
        };

        tx.commit()?;

        log::info!(
            "sensitive change recorded: id={} kind={} actor={}",
            change_id,
            change.kind.as_str(),
            change.actor
        );
        Ok(SensitiveChangeReceipt {
            change_id,
            alert_id,
        })
    }

    /// List sensitive changes, newest first
    pub fn sensitive_changes(
        &self,
        actor: Option<&str>,
        kind: Option<SensitiveChangeKind>,
        limit: Option<usize>,
    ) -> Result<Vec<SensitiveChangeEntry>, StoreError> {
        let mut sql = String::from(
            "SELECT id, created_at, actor, kind, description, before_value, after_value, reason \
             FROM sensitive_changes WHERE 1=1",
        );
        let mut bound: Vec<String> = Vec::new();

        if let Some(actor) = actor {
            sql.push_str(" AND actor = ?");
            bound.push(actor.to_string());
        }
        if let Some(kind) = kind {
            sql.push_str(" AND kind = ?");
            bound.push(kind.as_str().to_string());
        }
        sql.push_str(&format!(
            " ORDER BY created_at DESC, id DESC LIMIT {}",
            limit.unwrap_or(DEFAULT_LIMIT)
        ));

        let conn = self.db.lock();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(bound.iter()), |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, Option<String>>(5)?,
                row.get::<_, Option<String>>(6)?,
                row.get::<_, Option<String>>(7)?,
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (id, created_at, actor, kind, description, before, after, reason) = row?;
            entries.push(SensitiveChangeEntry {
                id,
                created_at: decode_ts(&created_at)?,
                actor,
                kind: SensitiveChangeKind::from_str(&kind).ok_or_else(|| {
                    StoreError::Corrupted(format!("unknown change kind {:?}", kind))
                })?,
                description,
                before,
                after,
                reason,
            });
        }
        Ok(entries)
    }

    /// Full audit rollup for one actor
    pub fn audit_report(&self, actor: &str) -> Result<AuditReport, StoreError> {
        let (total_activities, total_changes) = {
            let conn = self.db.lock();
            let activities: i64 = conn.query_row(
                "SELECT COUNT(*) FROM activities WHERE actor = ?1",
                params![actor],
                |row| row.get(0),
            )?;
            let changes: i64 = conn.query_row(
                "SELECT COUNT(*) FROM sensitive_changes WHERE actor = ?1",
                params![actor],
                |row| row.get(0),
            )?;
            (activities, changes)
        };

        let (total_analyses, mean_score, high, medium, low) = {
            let conn = self.db.lock();
            conn.query_row(
                "SELECT COUNT(*),
                        AVG(overall_score),
                        SUM(CASE WHEN risk_level = 'HIGH' THEN 1 ELSE 0 END),
                        SUM(CASE WHEN risk_level = 'MEDIUM' THEN 1 ELSE 0 END),
                        SUM(CASE WHEN risk_level = 'LOW' THEN 1 ELSE 0 END)
                 FROM analyses WHERE actor = ?1",
                params![actor],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, Option<f64>>(1)?.unwrap_or(0.0),
                        row.get::<_, Option<i64>>(2)?.unwrap_or(0),
                        row.get::<_, Option<i64>>(3)?.unwrap_or(0),
                        row.get::<_, Option<i64>>(4)?.unwrap_or(0),
                    ))
                },
            )?
        };

        let recent_activities = self.query(&ActivityFilter {
            actor: Some(actor),
            limit: Some(10),
            ..Default::default()
        })?;
        let recent_changes = self.sensitive_changes(Some(actor), None, Some(10))?;

        Ok(AuditReport {
            actor: actor.to_string(),
            generated_at: Utc::now(),
            total_activities: total_activities as u64,
            total_analyses: total_analyses as u64,
            total_sensitive_changes: total_changes as u64,
            mean_score,
            high_risk_analyses: high as u64,
            medium_risk_analyses: medium as u64,
            low_risk_analyses: low as u64,
            recent_activities,
            recent_changes,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
