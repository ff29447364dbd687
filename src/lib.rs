//! Academic Integrity Sentinel - Risk Scoring Core
//!
//! Flags academic documents for possible integrity violations by
//! combining discrete, human-entered evidence signals into a
//! calibrated risk score, and keeps an auditable record of every
//! operation performed against the system.
//!
//! The crate splits into a pure scoring engine and a persistence
//! layer:
//! - `engine` - evidence normalization, dimension scoring, contextual
//!   adjustment, aggregation and recommendations. Stateless, total,
//!   safe at arbitrary parallelism.
//! - `store` - analysis registry (deduplicated by content
//!   fingerprint), append-only audit log and alert stream over one
//!   shared SQLite database.
//! - `service` - the facade external handlers call: score, persist,
//!   audit, alert.
//! - `metrics` - institutional aggregates over persisted analyses.
//!
//! HTTP routing, authentication, document text extraction, report
//! rendering and narrative generation live in external collaborators;
//! they hand this crate already-validated values and consume its
//! results.
//!
//! ## Usage
//! ```ignore
//! use std::sync::Arc;
//! use integrity_core::{AnalysisRequest, AnalysisService, Database};
//!
//! let db = Arc::new(Database::open(&integrity_core::constants::database_path())?);
//! db.run_migrations()?;
//! let service = AnalysisService::new(db);
//! let outcome = service.analyze(&request)?;
//! ```

pub mod constants;
pub mod engine;
pub mod fingerprint;
pub mod metrics;
pub mod service;
pub mod store;

// Re-export the surface external handlers touch most
pub use engine::{
    normalize, score, validate, Dimension, EvidenceRecord, Indicator, RiskLevel, ScoreResult,
    ScoringThresholds,
};
pub use service::{AnalysisOutcome, AnalysisRequest, AnalysisService};
pub use store::{
    AlertLevel, AlertStore, AnalysisRecord, AnalysisRegistry, AuditStore, Database, StoreError,
};
