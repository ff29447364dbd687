//! Persistence Layer
//!
//! Analysis Registry, Audit Log and Alerting over one shared SQLite
//! database. All stores are explicit instances around an injected
//! `Arc<Database>` handle - construct the handle once at process
//! start, run migrations, then hand it to whatever needs it.
//!
//! ## Structure
//! - `db`: Connection handle and schema migrations
//! - `error`: StoreError
//! - `registry`: Analyses, one row per distinct document content
//! - `audit`: Activity log and sensitive-change ledger
//! - `alerts`: Alert stream with idempotent resolution

pub mod alerts;
pub mod audit;
pub mod db;
pub mod error;
pub mod registry;

pub use alerts::{Alert, AlertFilter, AlertLevel, AlertStore};
pub use audit::{
    ActivityEntry, ActivityFilter, ActivityOutcome, AuditReport, AuditStore, NewActivity,
    NewSensitiveChange, SensitiveChangeEntry, SensitiveChangeKind, SensitiveChangeReceipt,
};
pub use db::Database;
pub use error::StoreError;
pub use registry::{
    AnalysisFilter, AnalysisRecord, AnalysisRegistry, NewAnalysis, RegistrySummary,
};
