//! Scoring Rules & Thresholds
//!
//! Weight tables and threshold constants for the scoring engine.
//! No scoring logic here - only constants and config.
//!
//! All values are configuration defaults carried over from earlier
//! deployments; none have a documented empirical derivation. Treat
//! them as tunable, not calibrated.

use serde::{Deserialize, Serialize};

use super::types::{Dimension, Indicator};

// ============================================================================
// THRESHOLDS
// ============================================================================

/// Overall score at or above this = Medium
pub const MEDIUM_THRESHOLD: u8 = 33;

/// Overall score at or above this = High. Checked last, so 67+ can
/// never land in a lower band.
pub const HIGH_THRESHOLD: u8 = 67;

/// An adjusted dimension score above this marks the dimension critical
pub const CRITICAL_DIMENSION_THRESHOLD: f64 = 0.6;

/// Low-risk results below this overall score get the
/// "within normal parameters" recommendation
pub const NORMAL_PARAMETERS_MAX: u8 = 20;

/// Confidence boost contributed by each raw indicator marked present
pub const CONFIDENCE_BOOST_PER_SIGNAL: f64 = 0.1;

/// Cap on the evidence-count confidence boost
pub const CONFIDENCE_BOOST_CAP: f64 = 0.3;

/// Confidence reported when there are no dimension scores at all
pub const EMPTY_CONFIDENCE: f64 = 0.5;

// ============================================================================
// DIMENSION WEIGHTS
// ============================================================================

/// Indicator weights per dimension. Weights are normalized by their
/// sum at scoring time, so they need not add up to 1.
pub const AUTHORSHIP_STYLE_WEIGHTS: &[(Indicator, f64)] = &[
    (Indicator::StyleMismatch, 0.4),
    (Indicator::WeakDefense, 0.6),
];

pub const TIMING_PROCESS_WEIGHTS: &[(Indicator, f64)] = &[
    (Indicator::SuspiciousTiming, 0.5),
    (Indicator::NoDrafts, 0.5),
];

pub const REFERENCES_DATA_WEIGHTS: &[(Indicator, f64)] = &[
    (Indicator::UnverifiableReferences, 0.4),
    (Indicator::InconsistentData, 0.6),
];

pub const PRESENTATION_WEIGHTS: &[(Indicator, f64)] = &[(Indicator::SuspiciousImages, 1.0)];

/// Weight table for a dimension
pub fn indicator_weights(dimension: Dimension) -> &'static [(Indicator, f64)] {
    match dimension {
        Dimension::AuthorshipStyle => AUTHORSHIP_STYLE_WEIGHTS,
        Dimension::TimingProcess => TIMING_PROCESS_WEIGHTS,
        Dimension::ReferencesData => REFERENCES_DATA_WEIGHTS,
        Dimension::Presentation => PRESENTATION_WEIGHTS,
    }
}

// ============================================================================
// CONFIGURABLE THRESHOLDS (for runtime adjustment)
// ============================================================================

/// Thresholds for scoring (configurable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringThresholds {
    /// Overall score at or above this = Medium
    pub medium_min: u8,
    /// Overall score at or above this = High
    pub high_min: u8,
    /// Adjusted dimension score above this = critical
    pub critical_dimension: f64,
    /// Low-risk scores below this get the normal-parameters message
    pub normal_parameters_max: u8,
    /// Confidence boost per raw signal marked present
    pub confidence_boost_per_signal: f64,
    /// Cap on the evidence-count confidence boost
    pub confidence_boost_cap: f64,
}

impl Default for ScoringThresholds {
    fn default() -> Self {
        Self {
            medium_min: MEDIUM_THRESHOLD,
            high_min: HIGH_THRESHOLD,
            critical_dimension: CRITICAL_DIMENSION_THRESHOLD,
            normal_parameters_max: NORMAL_PARAMETERS_MAX,
            confidence_boost_per_signal: CONFIDENCE_BOOST_PER_SIGNAL,
            confidence_boost_cap: CONFIDENCE_BOOST_CAP,
        }
    }
}

impl ScoringThresholds {
    /// High sensitivity - lower band boundaries, more escalations
    pub fn high_sensitivity() -> Self {
        Self {
            medium_min: 25,
            high_min: 60,
            critical_dimension: 0.5,
            ..Default::default()
        }
    }

    /// Low sensitivity - higher band boundaries, fewer escalations
    pub fn low_sensitivity() -> Self {
        Self {
            medium_min: 40,
            high_min: 75,
            critical_dimension: 0.7,
            ..Default::default()
        }
    }
}
