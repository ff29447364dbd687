//! Scoring Engine
//!
//! Deterministic multi-dimensional risk scoring for academic-integrity
//! evidence. This is the core step - where evidence becomes a
//! Low/Medium/High risk classification.
//!
//! ## Structure
//! - `types`: Core types (EvidenceRecord, Dimension, RiskLevel, ScoreResult)
//! - `rules`: Weight tables, thresholds and constants
//! - `evidence`: Normalizer for raw submissions
//! - `scorer`: Dimension scoring, contextual adjustment, aggregation
//! - `recommend`: Recommendation rule table
//!
//! ## Usage
//! ```ignore
//! use integrity_core::engine::{evidence, scorer};
//!
//! let record = evidence::normalize(&raw_map);
//! let result = scorer::score(&record, "Student", "Essay");
//! match result.level {
//!     RiskLevel::Low => println!("Normal"),
//!     RiskLevel::Medium => println!("Review"),
//!     RiskLevel::High => println!("Escalate"),
//! }
//! ```

pub mod evidence;
pub mod recommend;
pub mod rules;
pub mod scorer;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export main types for convenience
pub use types::{
    AuthorRole, ContextFactors, Dimension, DimensionScore, DocumentType, EvidenceRecord,
    Indicator, RiskLevel, ScoreResult, ValidationReport,
};

pub use rules::{
    ScoringThresholds, CRITICAL_DIMENSION_THRESHOLD, HIGH_THRESHOLD, MEDIUM_THRESHOLD,
};

pub use evidence::normalize;
pub use recommend::recommend;
pub use scorer::{score, score_with_thresholds, validate};
