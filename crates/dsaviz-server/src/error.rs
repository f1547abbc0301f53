//! API error types with HTTP status code mapping.
//!
//! [`ApiError`] is the error type for all API endpoints. It implements
//! `axum::response::IntoResponse` to produce the `{ error, details }` JSON
//! body the front end expects.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::llm_provider::UpstreamError;

/// JSON body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Short, stable summary.
    pub error: String,
    /// Underlying cause, for diagnostics.
    pub details: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The upstream generator could not be reached (500).
    #[error(transparent)]
    UpstreamUnavailable(#[from] UpstreamError),

    /// The request body could not be decoded (400).
    #[error("bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::UpstreamUnavailable(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    error: "Failed to analyze algorithm".to_string(),
                    details: err.to_string(),
                },
            ),
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: "Invalid request body".to_string(),
                    details: msg.clone(),
                },
            ),
        };

        (status, axum::Json(body)).into_response()
    }
}
