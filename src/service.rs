//! Analysis Service
//!
//! The one entry point external handlers call: scores a submission,
//! persists the outcome, writes the audit trail and raises threshold
//! alerts. Constructed explicitly around an injected database handle -
//! no global state, single instance by convention at process start.
//!
//! Scoring is pure and always succeeds; only persistence can fail, and
//! a persistence failure propagates after the score was computed, so a
//! caller retry re-persists without rescoring.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::engine::rules::ScoringThresholds;
use crate::engine::types::{RiskLevel, ScoreResult};
use crate::engine::{evidence, scorer};
use crate::fingerprint::{composite_fingerprint, content_fingerprint};
use crate::store::{
    ActivityOutcome, AlertLevel, AlertStore, AnalysisRegistry, AuditStore, Database, NewActivity,
    NewAnalysis, StoreError,
};

// ============================================================================
// REQUEST / OUTCOME
// ============================================================================

/// One scoring submission, already validated upstream. Role and
/// document-type names outside the known sets are accepted and treated
/// as neutral context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub actor: String,
    pub role: String,
    pub document_type: String,
    /// Raw indicator markings; unknown keys are dropped, missing ones
    /// default to absent
    pub evidence: HashMap<String, f64>,
    /// Document text, when available, used for the registry
    /// deduplication fingerprint
    pub content: Option<String>,
}

/// What one analysis produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    pub analysis_id: i64,
    pub fingerprint: String,
    pub duration_ms: u64,
    pub result: ScoreResult,
}

// ============================================================================
// SERVICE
// ============================================================================

pub struct AnalysisService {
    registry: AnalysisRegistry,
    audit: AuditStore,
    alerts: AlertStore,
    thresholds: ScoringThresholds,
}

impl AnalysisService {
    pub fn new(db: Arc<Database>) -> Self {
        Self::with_thresholds(db, ScoringThresholds::default())
    }

    pub fn with_thresholds(db: Arc<Database>, thresholds: ScoringThresholds) -> Self {
        Self {
            registry: AnalysisRegistry::new(db.clone()),
            audit: AuditStore::new(db.clone()),
            alerts: AlertStore::new(db),
            thresholds,
        }
    }

    /// Score a submission and persist everything about it.
    ///
    /// The audit entry is written before this returns - no
    /// fire-and-forget. A High result additionally raises a High
    /// alert against the submitting actor.
    pub fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisOutcome, StoreError> {
        let started = Instant::now();

        let record = evidence::normalize(&request.evidence);
        let result = scorer::score_with_thresholds(
            &record,
            &request.role,
            &request.document_type,
            &self.thresholds,
        );

        let fingerprint = match &request.content {
            Some(text) => content_fingerprint(text),
            // No document text: the submission itself is the identity
            None => {
                let marks = serde_json::to_string(&record)?;
                composite_fingerprint(&[
                    &request.actor,
                    &request.role,
                    &request.document_type,
                    &marks,
                ])
            }
        };

        let duration_ms = started.elapsed().as_millis() as u64;

        let analysis_id = self.registry.record(&NewAnalysis {
            fingerprint: &fingerprint,
            actor: &request.actor,
            role: &request.role,
            document_type: &request.document_type,
            result: &result,
            duration_ms,
        })?;

        self.audit.append(&NewActivity {
            actor: &request.actor,
            kind: "analyze",
            target: Some(&fingerprint),
            outcome: ActivityOutcome::Success,
            details: Some(serde_json::json!({
                "role": request.role,
                "document_type": request.document_type,
                "signals": record.true_count(),
            })),
            result: Some(result.level.as_str()),
            duration_ms,
        })?;

        if result.level == RiskLevel::High {
            self.alerts.raise(
                AlertLevel::High,
                "high_risk_analysis",
                &format!(
                    "Analysis {} scored {} ({})",
                    analysis_id, result.overall, result.level
                ),
                Some(&request.actor),
            )?;
        }

        log::info!(
            "analysis complete: actor={} level={} overall={} in {}ms",
            request.actor,
            result.level,
            result.overall,
            duration_ms
        );

        Ok(AnalysisOutcome {
            analysis_id,
            fingerprint,
            duration_ms,
            result,
        })
    }

    pub fn registry(&self) -> &AnalysisRegistry {
        &self.registry
    }

    pub fn audit(&self) -> &AuditStore {
        &self.audit
    }

    pub fn alerts(&self) -> &AlertStore {
        &self.alerts
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ActivityFilter, AlertFilter, AnalysisFilter};

    fn service() -> AnalysisService {
        let _ = env_logger::builder().is_test(true).try_init();
        let db = Arc::new(Database::open_in_memory().unwrap());
        db.run_migrations().unwrap();
        AnalysisService::new(db)
    }

    fn request(evidence: &[(&str, f64)], content: Option<&str>) -> AnalysisRequest {
        AnalysisRequest {
            actor: "reviewer_a".to_string(),
            role: "Student".to_string(),
            document_type: "Essay".to_string(),
            evidence: evidence
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
            content: content.map(str::to_string),
        }
    }

    const ALL_SEVEN: [(&str, f64); 7] = [
        ("style_mismatch", 1.0),
        ("suspicious_timing", 1.0),
        ("unverifiable_references", 1.0),
        ("inconsistent_data", 1.0),
        ("suspicious_images", 1.0),
        ("no_drafts", 1.0),
        ("weak_defense", 1.0),
    ];

    #[test]
    fn test_clean_submission_end_to_end() {
        let service = service();
        let outcome = service
            .analyze(&request(&[], Some("an unremarkable essay")))
            .unwrap();

        assert_eq!(outcome.result.overall, 0);
        assert_eq!(outcome.result.level, RiskLevel::Low);
        assert!(outcome
            .result
            .recommendations
            .iter()
            .any(|r| r.contains("within normal parameters")));

        // Persisted and audited, no alert
        assert!(service
            .registry()
            .get(outcome.analysis_id)
            .unwrap()
            .is_some());
        let log = service.audit().query(&ActivityFilter::default()).unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].kind, "analyze");
        assert_eq!(log[0].result.as_deref(), Some("LOW"));
        assert!(service
            .alerts()
            .query(&AlertFilter::default())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_partial_evidence_stays_below_high() {
        let service = service();
        let outcome = service
            .analyze(&request(
                &[("style_mismatch", 1.0), ("unverifiable_references", 1.0)],
                Some("a partly suspicious essay"),
            ))
            .unwrap();

        assert!(outcome.result.overall > 0);
        assert!(outcome.result.overall < 67);
        assert!(outcome.result.critical_dimensions.is_empty());
    }

    #[test]
    fn test_saturated_thesis_raises_alert() {
        let service = service();
        let mut req = request(&ALL_SEVEN, Some("a thesis with every flag"));
        req.document_type = "Thesis".to_string();
        let outcome = service.analyze(&req).unwrap();

        assert_eq!(outcome.result.level, RiskLevel::High);
        assert!(outcome.result.overall >= 67);

        let alerts = service.alerts().query(&AlertFilter::default()).unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].level, AlertLevel::High);
        assert_eq!(alerts[0].kind, "high_risk_analysis");
        assert_eq!(alerts[0].affected_actor.as_deref(), Some("reviewer_a"));
    }

    #[test]
    fn test_resubmitting_same_content_upserts() {
        let service = service();
        let text = "a thesis with every flag, submitted twice";

        let mut first = request(&[("style_mismatch", 1.0)], Some(text));
        first.document_type = "Thesis".to_string();
        let mut second = request(&ALL_SEVEN, Some(text));
        second.document_type = "Thesis".to_string();

        let a = service.analyze(&first).unwrap();
        let b = service.analyze(&second).unwrap();

        assert_eq!(a.fingerprint, b.fingerprint);
        assert_eq!(a.analysis_id, b.analysis_id);

        let stored = service
            .registry()
            .list(&AnalysisFilter::default())
            .unwrap();
        assert_eq!(stored.len(), 1);
        // Latest score wins
        assert_eq!(stored[0].overall_score, b.result.overall);

        // Audit keeps both operations even though the registry holds one row
        let log = service.audit().query(&ActivityFilter::default()).unwrap();
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_missing_content_still_dedupes() {
        let service = service();
        let a = service
            .analyze(&request(&[("no_drafts", 1.0)], None))
            .unwrap();
        let b = service
            .analyze(&request(&[("no_drafts", 1.0)], None))
            .unwrap();
        assert_eq!(a.fingerprint, b.fingerprint);
        assert_eq!(a.analysis_id, b.analysis_id);

        let c = service
            .analyze(&request(&[("weak_defense", 1.0)], None))
            .unwrap();
        assert_ne!(a.fingerprint, c.fingerprint);
    }
}
