use schoolhub_core::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to persist '{key}': {source}")]
    Persist {
        key: &'static str,
        #[source]
        source: StorageError,
    },

    #[error("failed to load '{key}': {source}")]
    Load {
        key: &'static str,
        #[source]
        source: StorageError,
    },

    #[error("stored value under '{key}' could not be decoded: {source}")]
    Corrupt {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}
