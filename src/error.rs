//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("entity with empty name")]
    EmptyEntityName,
    #[error("duplicate entity: {0}")]
    DuplicateEntity(String),
    #[error("entity '{0}' has no fields")]
    NoFields(String),
    #[error("entity '{entity}' declares field '{field}' more than once")]
    DuplicateField { entity: String, field: String },
}

/// Operational errors. Only `BadRequest` is ever meant to reach a client;
/// the other variants exist so logs carry the real cause before the record
/// service collapses them into the uniform classification.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("bad request")]
    BadRequest { details: Option<serde_json::Value> },
    #[error("storage: {0}")]
    Storage(#[from] sqlx::Error),
    #[error("unknown field: {0}")]
    UnknownField(String),
    #[error("unsupported filter operator: {0}")]
    UnsupportedOperator(String),
    #[error("expected exactly one matching record, found {matched}")]
    NotExactlyOne { matched: usize },
}

impl AppError {
    /// The uniform client-facing classification with no diagnostic payload.
    pub fn bad_request() -> Self {
        AppError::BadRequest { details: None }
    }

    /// Bad request carrying a diagnostic object. Used only by the list route,
    /// the one place with user-facing validation.
    pub fn bad_request_with(details: serde_json::Value) -> Self {
        AppError::BadRequest {
            details: Some(details),
        }
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Every operational fault surfaces identically; internal variants are
        // already logged with detail before they get here.
        let details = match self {
            AppError::BadRequest { details } => details,
            _ => None,
        };
        let body = ErrorBody {
            error: ErrorDetail {
                code: "bad_request".to_string(),
                message: "Bad Request".to_string(),
                details,
            },
        };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}
