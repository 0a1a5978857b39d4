use std::env;
use std::path::PathBuf;

use crate::env_or;

#[derive(Clone, Debug)]
pub struct StorageConfig {
    /// Directory holding one JSON file per storage key.
    pub data_dir: PathBuf,
    /// Newest audit entries kept; older ones are dropped.
    pub audit_log_limit: usize,
    /// Data snapshots kept for undo.
    pub undo_history_limit: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("storage/data"),
            audit_log_limit: 1000,
            undo_history_limit: 50,
        }
    }
}

impl StorageConfig {
    pub fn from_env() -> Self {
        Self {
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("storage/data")),
            audit_log_limit: env_or("AUDIT_LOG_LIMIT", 1000),
            undo_history_limit: env_or("UNDO_HISTORY_LIMIT", 50),
        }
    }
}
