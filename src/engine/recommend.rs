//! Recommendation Generator
//!
//! Deterministic rule table keyed by (risk level, critical
//! dimensions). Level-driven recommendations come first, then one
//! block per critical dimension in declaration order. No side effects.

use super::rules::ScoringThresholds;
use super::types::{Dimension, RiskLevel};

/// Issued for every High-risk result, before anything else
const HIGH_RISK_ACTIONS: &[&str] = &[
    "Conduct an exhaustive review before taking any decision.",
    "Consider an additional interview with the author.",
    "Document all evidence thoroughly for audit purposes.",
];

const AUTHORSHIP_STYLE_ACTIONS: &[&str] = &[
    "Verify style changes through specialized comparison tooling.",
    "Request an oral defense to validate comprehension.",
];

const TIMING_PROCESS_ACTIONS: &[&str] = &[
    "Review the submission and version chronology.",
    "Request an explanation of the production timeline.",
];

const REFERENCES_DATA_ACTIONS: &[&str] = &[
    "Validate the cited references and reported data.",
    "Consult academic databases to verify originality.",
];

const PRESENTATION_ACTIONS: &[&str] = &[
    "Inspect figure and image metadata.",
    "Check visual consistency with the context of the work.",
];

/// Issued for Low-risk results scoring below the normal-parameters cap
const NORMAL_PARAMETERS_ACTIONS: &[&str] = &[
    "Work is within normal parameters.",
    "Continue periodic monitoring.",
];

fn dimension_actions(dimension: Dimension) -> &'static [&'static str] {
    match dimension {
        Dimension::AuthorshipStyle => AUTHORSHIP_STYLE_ACTIONS,
        Dimension::TimingProcess => TIMING_PROCESS_ACTIONS,
        Dimension::ReferencesData => REFERENCES_DATA_ACTIONS,
        Dimension::Presentation => PRESENTATION_ACTIONS,
    }
}

/// Build the ordered recommendation list for one result.
pub fn recommend(
    level: RiskLevel,
    overall: u8,
    critical_dimensions: &[Dimension],
    thresholds: &ScoringThresholds,
) -> Vec<String> {
    let mut recommendations: Vec<String> = Vec::new();

    if level == RiskLevel::High {
        recommendations.extend(HIGH_RISK_ACTIONS.iter().map(|s| s.to_string()));
    }

    // Declaration order, not the order critical dimensions were found in
    for dimension in Dimension::ALL {
        if critical_dimensions.contains(&dimension) {
            recommendations.extend(dimension_actions(dimension).iter().map(|s| s.to_string()));
        }
    }

    if level == RiskLevel::Low && overall < thresholds.normal_parameters_max {
        recommendations.extend(NORMAL_PARAMETERS_ACTIONS.iter().map(|s| s.to_string()));
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_high_risk_leads_with_escalation() {
        let recs = recommend(
            RiskLevel::High,
            80,
            &[Dimension::Presentation],
            &ScoringThresholds::default(),
        );
        assert_eq!(recs[0], HIGH_RISK_ACTIONS[0]);
        assert!(recs.contains(&PRESENTATION_ACTIONS[0].to_string()));
    }

    #[test]
    fn test_dimension_blocks_follow_declaration_order() {
        // Pass critical dimensions out of order; output must not care
        let recs = recommend(
            RiskLevel::Medium,
            50,
            &[Dimension::ReferencesData, Dimension::AuthorshipStyle],
            &ScoringThresholds::default(),
        );
        let authorship = recs
            .iter()
            .position(|r| r.as_str() == AUTHORSHIP_STYLE_ACTIONS[0])
            .unwrap();
        let references = recs
            .iter()
            .position(|r| r.as_str() == REFERENCES_DATA_ACTIONS[0])
            .unwrap();
        assert!(authorship < references);
    }

    #[test]
    fn test_low_score_gets_normal_parameters() {
        let recs = recommend(RiskLevel::Low, 0, &[], &ScoringThresholds::default());
        assert_eq!(recs, NORMAL_PARAMETERS_ACTIONS);
    }

    #[test]
    fn test_low_level_above_cap_gets_nothing() {
        let recs = recommend(RiskLevel::Low, 25, &[], &ScoringThresholds::default());
        assert!(recs.is_empty());
    }
}
