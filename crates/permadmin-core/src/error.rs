//! Error types for the permissions admin service.

use thiserror::Error;

use crate::validation::FieldViolation;

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    /// A uniqueness constraint (user id or email) would be violated.
    #[error("Conflict: {entity} with {field} {value} already exists")]
    Conflict {
        entity: String,
        field: String,
        value: String,
    },

    /// Input rejected before any state was touched. Carries every violation found.
    #[error("Validation error: {} violation(s)", .violations.len())]
    Validation { violations: Vec<FieldViolation> },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AdminError {
    pub fn user_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "user".into(),
            id: id.into(),
        }
    }

    pub fn permission_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "permission".into(),
            id: id.into(),
        }
    }
}

pub type AdminResult<T> = Result<T, AdminError>;
