//! Risk Scorer
//!
//! Dimension scoring, contextual adjustment and aggregation.
//! Input: EvidenceRecord + raw role/type names.
//! Output: ScoreResult.
//!
//! Every function here is a pure computation over its inputs and the
//! static weight tables - no I/O, no shared state, safe to call at
//! arbitrary parallelism.

use crate::constants::MODEL_VERSION;

use super::recommend::recommend;
use super::rules::{indicator_weights, ScoringThresholds, EMPTY_CONFIDENCE};
use super::types::{
    ContextFactors, Dimension, DimensionScore, EvidenceRecord, Indicator, RiskLevel, ScoreResult,
    ValidationReport,
};

// ============================================================================
// MAIN SCORING FUNCTION
// ============================================================================

/// Score an evidence record in context, with default thresholds.
pub fn score(evidence: &EvidenceRecord, role: &str, document_type: &str) -> ScoreResult {
    score_with_thresholds(evidence, role, document_type, &ScoringThresholds::default())
}

/// Scoring with custom thresholds.
pub fn score_with_thresholds(
    evidence: &EvidenceRecord,
    role: &str,
    document_type: &str,
    thresholds: &ScoringThresholds,
) -> ScoreResult {
    let raw = dimension_scores(evidence);
    let context = ContextFactors::resolve(role, document_type);
    let adjusted = apply_context(&raw, &context);

    let boost = (evidence.true_count() as f64 * thresholds.confidence_boost_per_signal)
        .min(thresholds.confidence_boost_cap);
    let (overall, level, confidence) = aggregate(&adjusted, boost, thresholds);

    let critical_dimensions: Vec<Dimension> = adjusted
        .iter()
        .filter(|d| d.score > thresholds.critical_dimension)
        .map(|d| d.dimension)
        .collect();

    let recommendations = recommend(level, overall, &critical_dimensions, thresholds);

    ScoreResult {
        dimension_scores: adjusted,
        overall,
        level,
        confidence,
        critical_dimensions,
        recommendations,
        model_version: MODEL_VERSION.to_string(),
    }
}

// ============================================================================
// DIMENSION SCORER
// ============================================================================

/// Normalized scores for all dimensions, in declaration order.
pub fn dimension_scores(evidence: &EvidenceRecord) -> Vec<DimensionScore> {
    Dimension::ALL
        .iter()
        .map(|&dimension| DimensionScore {
            dimension,
            score: dimension_score(evidence, indicator_weights(dimension)),
        })
        .collect()
}

/// One dimension: sum(value x weight) / sum(weight), in [0, 1].
///
/// A zero total weight is a misconfigured table; it scores 0 rather
/// than dividing by zero.
pub fn dimension_score(evidence: &EvidenceRecord, weights: &[(Indicator, f64)]) -> f64 {
    let total: f64 = weights.iter().map(|(_, w)| w).sum();
    if total <= 0.0 {
        return 0.0;
    }
    let weighted: f64 = weights
        .iter()
        .map(|(indicator, w)| evidence.value(*indicator) * w)
        .sum();
    weighted / total
}

// ============================================================================
// CONTEXTUAL ADJUSTER
// ============================================================================

/// Rescale dimension scores by the role/type multipliers, capped at
/// 1.0 so contextual amplification can never push a dimension above
/// full risk.
pub fn apply_context(scores: &[DimensionScore], context: &ContextFactors) -> Vec<DimensionScore> {
    let factor = context.combined();
    scores
        .iter()
        .map(|d| DimensionScore {
            dimension: d.dimension,
            score: (d.score * factor).min(1.0),
        })
        .collect()
}

// ============================================================================
// RISK AGGREGATOR
// ============================================================================

/// Reduce adjusted scores to (overall 0-100, level, confidence 0-1).
///
/// Confidence is 1 minus the spread between the strongest and weakest
/// dimension, plus the evidence-count boost, capped at 1.0. An empty
/// score set yields overall 0 and the neutral confidence default.
pub fn aggregate(
    adjusted: &[DimensionScore],
    boost: f64,
    thresholds: &ScoringThresholds,
) -> (u8, RiskLevel, f64) {
    if adjusted.is_empty() {
        return (0, RiskLevel::Low, EMPTY_CONFIDENCE);
    }

    let mean = adjusted.iter().map(|d| d.score).sum::<f64>() / adjusted.len() as f64;
    let overall = (mean * 100.0).round().clamp(0.0, 100.0) as u8;

    // Band lookup, High re-checked last: a score at or above high_min
    // is always High.
    let mut level = RiskLevel::Low;
    if overall >= thresholds.medium_min {
        level = RiskLevel::Medium;
    }
    if overall >= thresholds.high_min {
        level = RiskLevel::High;
    }

    let max = adjusted.iter().map(|d| d.score).fold(f64::MIN, f64::max);
    let min = adjusted.iter().map(|d| d.score).fold(f64::MAX, f64::min);
    let confidence = (1.0 - (max - min) + boost).min(1.0);

    (overall, level, confidence)
}

// ============================================================================
// VALIDATION
// ============================================================================

/// Confidence below this is flagged as low in validation reports
const LOW_CONFIDENCE_FLOOR: f64 = 0.4;

/// Sanity-check a produced result. Used by reporting layers before
/// presenting a result to a committee.
pub fn validate(result: &ScoreResult) -> ValidationReport {
    let mut warnings = Vec::new();
    let mut out_of_range = false;

    if !(0.0..=1.0).contains(&result.confidence) {
        out_of_range = true;
        warnings.push(format!(
            "confidence {:.3} outside expected range 0-1",
            result.confidence
        ));
    }

    for d in &result.dimension_scores {
        if !(0.0..=1.0).contains(&d.score) {
            out_of_range = true;
            warnings.push(format!(
                "dimension {} score {:.3} outside expected range 0-1",
                d.dimension, d.score
            ));
        }
    }

    let low_confidence = result.confidence < LOW_CONFIDENCE_FLOOR;
    if low_confidence {
        warnings.push(format!("low analysis confidence ({:.3})", result.confidence));
    }

    ValidationReport {
        is_valid: !out_of_range,
        low_confidence,
        warnings,
    }
}
