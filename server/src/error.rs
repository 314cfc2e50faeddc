//! Error types for the store and the HTTP layer.
//!
//! # Design
//! Two failure classes reach a client: a `ValidationError` is caused by the
//! request and answered with 400; a `StoreError` is any database failure and
//! is answered with 500. The 500 body never carries the database message,
//! which is logged instead.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Any failure reported by the database or its connection pool.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// A required field was missing or blank.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("All fields are required")]
pub struct ValidationError;

/// Everything a handler can fail with.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The request body was not a JSON object of the expected shape.
    #[error("{0}")]
    MalformedBody(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// JSON body of every non-2xx response produced by this crate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match &self {
            AppError::Store(err) => {
                tracing::error!(error = %err, "store operation failed");
                INTERNAL_ERROR_MESSAGE.to_string()
            }
            other => {
                tracing::debug!(error = %other, "rejected request");
                other.to_string()
            }
        };
        (status, Json(ErrorBody { error })).into_response()
    }
}
