//! API error handling.
//!
//! [`ApiError`] renders the `/v1` error body `{code, message, details?}`.
//! [`LegacyError`] wraps it for the unversioned routes, which answer with
//! `{error}` instead.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use permadmin_core::error::AdminError;
use permadmin_core::validation::FieldViolation;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{message}")]
    NotFound { message: String },

    #[error("{message}")]
    Conflict { message: String },

    #[error("The request body is invalid")]
    Validation { details: Vec<FieldViolation> },

    #[error("{message}")]
    Internal { message: String },
}

/// Error body of the `/v1` routes.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldViolation>>,
}

impl ApiError {
    /// A body that could not be decoded as the expected JSON.
    pub fn malformed_body(reason: impl Into<String>) -> Self {
        Self::Validation {
            details: vec![FieldViolation::new(
                permadmin_core::validation::ViolationKind::Type,
                "body",
                reason,
            )],
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound { .. } => "NOT_FOUND",
            ApiError::Conflict { .. } => "CONFLICT",
            ApiError::Validation { .. } => "VALIDATION_ERROR",
            ApiError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<AdminError> for ApiError {
    fn from(err: AdminError) -> Self {
        match err {
            AdminError::NotFound { entity, .. } => Self::NotFound {
                message: format!("{} not found", capitalize(&entity)),
            },
            AdminError::Conflict {
                entity,
                field,
                value,
            } => Self::Conflict {
                message: format!("A {entity} with {field} '{value}' already exists"),
            },
            AdminError::Validation { violations } => Self::Validation {
                details: violations,
            },
            AdminError::Internal(message) => {
                tracing::error!(error = %message, "Internal error while handling request");
                Self::Internal {
                    message: "Internal server error".into(),
                }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            code: self.code(),
            message: self.to_string(),
            details: match self {
                ApiError::Validation { details } => Some(details),
                _ => None,
            },
        };
        (status, Json(body)).into_response()
    }
}

/// Error rendered as `{"error": "..."}` for the unversioned routes.
#[derive(Debug)]
pub struct LegacyError(pub ApiError);

impl From<AdminError> for LegacyError {
    fn from(err: AdminError) -> Self {
        Self(err.into())
    }
}

impl From<ApiError> for LegacyError {
    fn from(err: ApiError) -> Self {
        Self(err)
    }
}

impl IntoResponse for LegacyError {
    fn into_response(self) -> Response {
        let status = self.0.status();
        let error = match &self.0 {
            ApiError::Validation { details } => details
                .iter()
                .map(|v| format!("{}: {}", v.field, v.reason))
                .collect::<Vec<_>>()
                .join("; "),
            other => other.to_string(),
        };
        (status, Json(serde_json::json!({ "error": error }))).into_response()
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_entity() {
        let err: ApiError = AdminError::user_not_found("u1").into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "User not found");
    }

    #[test]
    fn internal_details_are_not_leaked() {
        let err: ApiError = AdminError::Internal("lock poisoned at 0xdead".into()).into();
        assert_eq!(err.code(), "INTERNAL_ERROR");
        assert!(!err.to_string().contains("0xdead"));
    }
}
