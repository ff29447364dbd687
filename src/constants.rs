//! Central Configuration Constants
//!
//! Single source of truth for configuration defaults.
//! To change the data directory or model version, only edit this file.

use std::path::PathBuf;

/// App name, also used as the data directory name
pub const APP_NAME: &str = "integrity-sentinel";

/// Version tag stamped on every score result.
///
/// Bumped whenever the scoring rules change so persisted analyses
/// remain attributable to the rules that produced them.
pub const MODEL_VERSION: &str = "2.2";

/// Default database file name
pub const DEFAULT_DB_FILE: &str = "integrity.db";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Default data directory (platform-local app data)
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Get database path from environment or use default
pub fn database_path() -> PathBuf {
    std::env::var("INTEGRITY_DB_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| default_data_dir().join(DEFAULT_DB_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_path_has_file_name() {
        let path = database_path();
        assert!(path.file_name().is_some());
    }
}
