//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

/// One validation failure, tagged with the offending field path
/// (e.g. `results[2].measured_value`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub path: String,
    pub message: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Violation {
            path: path.into(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("duplicate path segment: {0}")]
    DuplicatePathSegment(String),
    #[error("resource {resource}: unknown field '{field}' referenced as {role}")]
    UnknownField {
        resource: String,
        field: String,
        role: &'static str,
    },
    #[error("resource {resource}: field '{field}' default is not a member of its enum set")]
    DefaultOutsideEnum { resource: String, field: String },
    #[error("resource {resource}: field '{field}' default does not match its type")]
    DefaultTypeMismatch { resource: String, field: String },
    #[error("resource {resource}: field '{field}' has an invalid pattern")]
    InvalidPattern { resource: String, field: String },
    #[error("resource {resource}: alternate lookup '{field}' is not a declared unique field")]
    AlternateNotUnique { resource: String, field: String },
    #[error("resource {resource}: captures_creator requires requires_auth")]
    CreatorWithoutAuth { resource: String },
    #[error("resource {resource}: id field '{field}' must not appear in the schema")]
    IdFieldInSchema { resource: String, field: String },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid input data")]
    Validation(Vec<Violation>),
    #[error("duplicate value for '{0}'")]
    Conflict(String),
    #[error("authentication required")]
    Unauthorized,
    #[error("request timed out")]
    Timeout,
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("store: {0}")]
    Store(#[from] StoreError),
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<Violation>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, errors) = match self {
            AppError::Validation(violations) => (
                StatusCode::BAD_REQUEST,
                "Invalid input data".to_string(),
                Some(violations),
            ),
            AppError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{} not found", what), None),
            AppError::Conflict(field) => (
                StatusCode::CONFLICT,
                format!("duplicate value for '{}'", field),
                None,
            ),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "authentication required".to_string(),
                None,
            ),
            AppError::Timeout => (
                StatusCode::GATEWAY_TIMEOUT,
                "request timed out".to_string(),
                None,
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            // Internal faults: full detail stays in the server log, the
            // caller only sees a generic message.
            AppError::Store(e) => {
                tracing::error!(error = %e, "store fault");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                    None,
                )
            }
            AppError::Config(e) => {
                tracing::error!(error = %e, "config fault");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                    None,
                )
            }
        };
        (status, Json(ErrorBody { error, errors })).into_response()
    }
}
