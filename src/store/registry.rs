//! Analysis Registry
//!
//! Persists one AnalysisRecord per distinct document content, keyed by
//! the content fingerprint. Re-submitting the same content overwrites
//! the stored score in place (atomic upsert) - the registry never
//! holds two records for one fingerprint.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::engine::types::{Dimension, DimensionScore, RiskLevel, ScoreResult};

use super::db::{decode_ts, encode_ts, Database};
use super::error::StoreError;

// ============================================================================
// RECORDS
// ============================================================================

/// A scoring outcome to persist
#[derive(Debug, Clone)]
pub struct NewAnalysis<'a> {
    pub fingerprint: &'a str,
    pub actor: &'a str,
    pub role: &'a str,
    pub document_type: &'a str,
    pub result: &'a ScoreResult,
    pub duration_ms: u64,
}

/// A persisted analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: i64,
    pub fingerprint: String,
    pub actor: String,
    pub role: String,
    pub document_type: String,
    pub overall_score: u8,
    pub level: RiskLevel,
    pub confidence: f64,
    pub dimension_scores: Vec<DimensionScore>,
    pub critical_dimensions: Vec<Dimension>,
    pub recommendations: Vec<String>,
    pub model_version: String,
    pub duration_ms: u64,
    pub created_at: DateTime<Utc>,
}

/// Query filters for `list`. Defaults select everything, newest first,
/// capped at 100 rows.
#[derive(Debug, Clone, Default)]
pub struct AnalysisFilter<'a> {
    pub actor: Option<&'a str>,
    pub level: Option<RiskLevel>,
    pub role: Option<&'a str>,
    pub since: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

/// Aggregate counts over a set of analyses. An empty registry yields
/// the zeroed summary, never an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistrySummary {
    pub total: u64,
    pub low: u64,
    pub medium: u64,
    pub high: u64,
    pub mean_score: f64,
}

const DEFAULT_LIMIT: usize = 100;

// ============================================================================
// REGISTRY
// ============================================================================

pub struct AnalysisRegistry {
    db: Arc<Database>,
}

impl AnalysisRegistry {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Persist an analysis. If a record with the same fingerprint
    /// exists, its score fields and timestamp are overwritten and the
    /// existing id is returned; the original actor/role/type survive.
    /// The conflict is resolved inside SQLite, so concurrent
    /// submissions of identical content converge to one row.
    pub fn record(&self, analysis: &NewAnalysis<'_>) -> Result<i64, StoreError> {
        let result = analysis.result;
        let dimension_scores = serde_json::to_string(&result.dimension_scores)?;
        let critical_dimensions = serde_json::to_string(&result.critical_dimensions)?;
        let recommendations = serde_json::to_string(&result.recommendations)?;

        let conn = self.db.lock();
        let id = conn.query_row(
            "INSERT INTO analyses (
                content_fingerprint, actor, role, document_type,
                overall_score, risk_level, confidence, dimension_scores,
                critical_dimensions, recommendations, model_version,
                duration_ms, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            ON CONFLICT(content_fingerprint) DO UPDATE SET
                overall_score = excluded.overall_score,
                risk_level = excluded.risk_level,
                confidence = excluded.confidence,
                dimension_scores = excluded.dimension_scores,
                critical_dimensions = excluded.critical_dimensions,
                recommendations = excluded.recommendations,
                model_version = excluded.model_version,
                duration_ms = excluded.duration_ms,
                created_at = excluded.created_at
            RETURNING id",
            params![
                analysis.fingerprint,
                analysis.actor,
                analysis.role,
                analysis.document_type,
                result.overall as i64,
                result.level.as_str(),
                result.confidence,
                dimension_scores,
                critical_dimensions,
                recommendations,
                result.model_version,
                analysis.duration_ms as i64,
                encode_ts(Utc::now()),
            ],
            |row| row.get::<_, i64>(0),
        )?;

        log::info!(
            "analysis recorded: id={} level={} fingerprint={}",
            id,
            result.level,
            &analysis.fingerprint[..analysis.fingerprint.len().min(12)]
        );
        Ok(id)
    }

    /// Fetch one analysis by id
    pub fn get(&self, id: i64) -> Result<Option<AnalysisRecord>, StoreError> {
        let conn = self.db.lock();
        let raw = conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_ANALYSIS),
                params![id],
                read_raw,
            )
            .optional()?;
        raw.map(decode).transpose()
    }

    /// Fetch one analysis by content fingerprint
    pub fn get_by_fingerprint(&self, fingerprint: &str) -> Result<Option<AnalysisRecord>, StoreError> {
        let conn = self.db.lock();
        let raw = conn
            .query_row(
                &format!("{} WHERE content_fingerprint = ?1", SELECT_ANALYSIS),
                params![fingerprint],
                read_raw,
            )
            .optional()?;
        raw.map(decode).transpose()
    }

    /// List analyses matching the filter, most recent first. The query
    /// is stateless - callers can re-run it freely.
    pub fn list(&self, filter: &AnalysisFilter<'_>) -> Result<Vec<AnalysisRecord>, StoreError> {
        let mut sql = format!("{} WHERE 1=1", SELECT_ANALYSIS);
        let mut bound: Vec<String> = Vec::new();

        if let Some(actor) = filter.actor {
            sql.push_str(" AND actor = ?");
            bound.push(actor.to_string());
        }
        if let Some(level) = filter.level {
            sql.push_str(" AND risk_level = ?");
            bound.push(level.as_str().to_string());
        }
        if let Some(role) = filter.role {
            sql.push_str(" AND role = ?");
            bound.push(role.to_string());
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
        let rows = stmt.query_map(rusqlite::params_from_iter(bound.iter()), read_raw)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(decode(row?)?);
        }
        Ok(records)
    }

    /// Counts by level plus mean score, optionally restricted to
    /// records newer than `since`.
    pub fn summary(&self, since: Option<DateTime<Utc>>) -> Result<RegistrySummary, StoreError> {
        let (clause, bound) = match since {
            Some(ts) => (" WHERE created_at > ?1", vec![encode_ts(ts)]),
            None => ("", Vec::new()),
        };
        let sql = format!(
            "SELECT COUNT(*),
                    SUM(CASE WHEN risk_level = 'LOW' THEN 1 ELSE 0 END),
                    SUM(CASE WHEN risk_level = 'MEDIUM' THEN 1 ELSE 0 END),
                    SUM(CASE WHEN risk_level = 'HIGH' THEN 1 ELSE 0 END),
                    AVG(overall_score)
             FROM analyses{}",
            clause
        );

        let conn = self.db.lock();
        let summary = conn.query_row(&sql, rusqlite::params_from_iter(bound.iter()), |row| {
            Ok(RegistrySummary {
                total: row.get::<_, i64>(0)? as u64,
                low: row.get::<_, Option<i64>>(1)?.unwrap_or(0) as u64,
                medium: row.get::<_, Option<i64>>(2)?.unwrap_or(0) as u64,
                high: row.get::<_, Option<i64>>(3)?.unwrap_or(0) as u64,
                mean_score: row.get::<_, Option<f64>>(4)?.unwrap_or(0.0),
            })
        })?;
        Ok(summary)
    }
}

// ============================================================================
// ROW MAPPING
// ============================================================================

const SELECT_ANALYSIS: &str = "SELECT id, content_fingerprint, actor, role, document_type, \
     overall_score, risk_level, confidence, dimension_scores, critical_dimensions, \
     recommendations, model_version, duration_ms, created_at FROM analyses";

struct RawAnalysis {
    id: i64,
    fingerprint: String,
    actor: String,
    role: String,
    document_type: String,
    overall_score: i64,
    level: String,
    confidence: f64,
    dimension_scores: String,
    critical_dimensions: String,
    recommendations: String,
    model_version: String,
    duration_ms: i64,
    created_at: String,
}

fn read_raw(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawAnalysis> {
    Ok(RawAnalysis {
        id: row.get(0)?,
        fingerprint: row.get(1)?,
        actor: row.get(2)?,
        role: row.get(3)?,
        document_type: row.get(4)?,
        overall_score: row.get(5)?,
        level: row.get(6)?,
        confidence: row.get(7)?,
        dimension_scores: row.get(8)?,
        critical_dimensions: row.get(9)?,
        recommendations: row.get(10)?,
        model_version: row.get(11)?,
        duration_ms: row.get(12)?,
        created_at: row.get(13)?,
    })
}

fn decode(raw: RawAnalysis) -> Result<AnalysisRecord, StoreError> {
    let level = RiskLevel::from_str(&raw.level)
        .ok_or_else(|| StoreError::Corrupted(format!("unknown risk level {:?}", raw.level)))?;
    let overall_score = u8::try_from(raw.overall_score)
        .map_err(|_| StoreError::Corrupted(format!("overall score {} out of range", raw.overall_score)))?;

    Ok(AnalysisRecord {
        id: raw.id,
        fingerprint: raw.fingerprint,
        actor: raw.actor,
        role: raw.role,
        document_type: raw.document_type,
        overall_score,
        level,
        confidence: raw.confidence,
        dimension_scores: serde_json::from_str(&raw.dimension_scores)
            .map_err(|e| StoreError::Corrupted(e.to_string()))?,
        critical_dimensions: serde_json::from_str(&raw.critical_dimensions)
            .map_err(|e| StoreError::Corrupted(e.to_string()))?,
        recommendations: serde_json::from_str(&raw.recommendations)
            .map_err(|e| StoreError::Corrupted(e.to_string()))?,
        model_version: raw.model_version,
        duration_ms: raw.duration_ms.max(0) as u64,
        created_at: decode_ts(&raw.created_at)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================
