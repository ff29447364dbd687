//! Engine scenario and property tests

use std::collections::HashMap;

use super::evidence::normalize;
use super::rules::ScoringThresholds;
use super::scorer::{aggregate, apply_context, dimension_score, score, validate};
use super::types::{
    ContextFactors, Dimension, DimensionScore, EvidenceRecord, Indicator, RiskLevel,
};

fn raw(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

fn all_true() -> EvidenceRecord {
    EvidenceRecord::with(&Indicator::ALL)
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn test_scenario_clean_essay() {
    // All seven indicators absent, Student / Essay
    let record = normalize(&HashMap::new());
    let result = score(&record, "Student", "Essay");

    assert_eq!(result.overall, 0);
    assert_eq!(result.level, RiskLevel::Low);
    assert!(result.critical_dimensions.is_empty());
    assert!(result
        .recommendations
        .iter()
        .any(|r| r.contains("within normal parameters")));
}

#[test]
fn test_scenario_two_signals_stays_below_high() {
    let record = normalize(&raw(&[
        ("style_mismatch", 1.0),
        ("unverifiable_references", 1.0),
    ]));
    let result = score(&record, "Student", "Essay");

    assert!(result.overall > 0);
    assert!(result.overall < 67);
    // Essay dampening keeps both dimensions at 0.32, well under critical
    assert!(result.critical_dimensions.is_empty());
}

#[test]
fn test_scenario_saturated_thesis_escalates() {
    let result = score(&all_true(), "Student", "Thesis");

    assert_eq!(result.level, RiskLevel::High);
    assert!(result.overall >= 67);
    assert!(result
        .recommendations
        .iter()
        .any(|r| r.contains("exhaustive review")));
    // At least one recommendation per dimension
    for dimension in Dimension::ALL {
        assert!(
            result.critical_dimensions.contains(&dimension),
            "{} not critical",
            dimension
        );
    }
    // 3 escalation + 2 per critical dimension
    assert_eq!(result.recommendations.len(), 3 + 2 * Dimension::ALL.len());
}

// ============================================================================
// PROPERTIES
// ============================================================================

#[test]
fn test_flipping_an_indicator_never_decreases_overall() {
    let bases = [
        EvidenceRecord::default(),
        EvidenceRecord::with(&[Indicator::SuspiciousTiming, Indicator::InconsistentData]),
        EvidenceRecord::with(&[Indicator::WeakDefense]),
    ];

    for base in bases {
        let before = score(&base, "Student", "Thesis").overall;
        for indicator in Indicator::ALL {
            if base.is_set(indicator) {
                continue;
            }
            let mut flipped = base;
            flipped.set(indicator, true);
            let after = score(&flipped, "Student", "Thesis").overall;
            assert!(
                after >= before,
                "flipping {} dropped overall {} -> {}",
                indicator.key(),
                before,
                after
            );
        }
    }
}

#[test]
fn test_bounds_hold_at_extremes() {
    let contexts = [
        ("Student", "Essay"),
        ("Student", "Thesis"),
        ("Faculty Researcher", "Journal Article"),
        ("nobody", "nothing"),
    ];

    for record in [EvidenceRecord::default(), all_true()] {
        for (role, doc) in contexts {
            let result = score(&record, role, doc);
            assert!(result.overall <= 100);
            assert!((0.0..=1.0).contains(&result.confidence));
            for d in &result.dimension_scores {
                assert!((0.0..=1.0).contains(&d.score));
            }
        }
    }
}

#[test]
fn test_unknown_context_is_neutral() {
    let record = EvidenceRecord::with(&[Indicator::StyleMismatch]);
    let neutral = score(&record, "Unheard-of Role", "Unheard-of Type");
    let raw_scores = super::scorer::dimension_scores(&record);

    for (adjusted, raw) in neutral.dimension_scores.iter().zip(raw_scores.iter()) {
        assert_eq!(adjusted.score, raw.score);
    }
}

#[test]
fn test_amplification_is_capped_at_full_risk() {
    // Presentation saturates at 1.0; Thesis would push it to 1.2
    let record = EvidenceRecord::with(&[Indicator::SuspiciousImages]);
    let context = ContextFactors::resolve("Student", "Thesis");
    let adjusted = apply_context(&super::scorer::dimension_scores(&record), &context);

    let presentation = adjusted
        .iter()
        .find(|d| d.dimension == Dimension::Presentation)
        .unwrap();
    assert_eq!(presentation.score, 1.0);
}

// ============================================================================
// AGGREGATION
// ============================================================================

fn flat(score: f64) -> Vec<DimensionScore> {
    Dimension::ALL
        .iter()
        .map(|&dimension| DimensionScore { dimension, score })
        .collect()
}

#[test]
fn test_band_boundaries() {
    let t = ScoringThresholds::default();
    assert_eq!(aggregate(&flat(0.32), 0.0, &t).1, RiskLevel::Low);
    assert_eq!(aggregate(&flat(0.33), 0.0, &t).1, RiskLevel::Medium);
    assert_eq!(aggregate(&flat(0.66), 0.0, &t).1, RiskLevel::Medium);
    // Exactly at the High boundary is always High
    assert_eq!(aggregate(&flat(0.67), 0.0, &t).1, RiskLevel::High);
    assert_eq!(aggregate(&flat(1.0), 0.0, &t).1, RiskLevel::High);
}

#[test]
fn test_empty_scores_default() {
    let (overall, level, confidence) = aggregate(&[], 0.3, &ScoringThresholds::default());
    assert_eq!(overall, 0);
    assert_eq!(level, RiskLevel::Low);
    assert_eq!(confidence, 0.5);
}

#[test]
fn test_confidence_rewards_agreement() {
    let t = ScoringThresholds::default();
    let agreeing = aggregate(&flat(0.5), 0.0, &t).2;
    let mut spread = flat(0.5);
    spread[0].score = 1.0;
    spread[3].score = 0.0;
    let disagreeing = aggregate(&spread, 0.0, &t).2;
    assert!(agreeing > disagreeing);
}

#[test]
fn test_confidence_boost_is_capped() {
    let result = score(&all_true(), "Student", "Thesis");
    // All dimensions agree at 1.0 and the boost is capped, so
    // confidence tops out at exactly 1.0
    assert_eq!(result.confidence, 1.0);
}

#[test]
fn test_zero_weight_table_scores_zero() {
    assert_eq!(dimension_score(&all_true(), &[]), 0.0);
    assert_eq!(
        dimension_score(&all_true(), &[(Indicator::StyleMismatch, 0.0)]),
        0.0
    );
}

// ============================================================================
// VALIDATION
// ============================================================================

#[test]
fn test_validate_accepts_engine_output() {
    let report = validate(&score(&all_true(), "Student", "Thesis"));
    assert!(report.is_valid);
    assert!(!report.low_confidence);
    assert!(report.warnings.is_empty());
}

#[test]
fn test_validate_flags_low_confidence() {
    // One saturated dimension against three silent ones: wide spread,
    // small boost
    let record = EvidenceRecord::with(&[Indicator::SuspiciousImages]);
    let result = score(&record, "Student", "Essay");
    assert!(result.confidence < 0.4);

    let report = validate(&result);
    assert!(report.is_valid);
    assert!(report.low_confidence);
    assert_eq!(report.warnings.len(), 1);
}
