//! Store-specific error types and conversions.

use permadmin_core::error::AdminError;

/// Store-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Seed file could not be read: {0}")]
    Io(#[from] std::io::Error),

    #[error("Seed file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid seed data: {0}")]
    Seed(String),
}

impl From<StoreError> for AdminError {
    fn from(err: StoreError) -> Self {
        AdminError::Internal(err.to_string())
    }
}
