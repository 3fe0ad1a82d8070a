//! Error types for project persistence

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported project version: {0}")]
    UnsupportedVersion(u32),
}

pub type Result<T> = std::result::Result<T, StoreError>;
