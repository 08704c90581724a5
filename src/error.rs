// src/error.rs
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failure of a single upstream CMS call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("request to {path} failed: {message}")]
    Transport { path: String, message: String },

    #[error("{path} returned HTTP {status}")]
    Status { path: String, status: u16 },

    #[error("{path} timed out after {timeout_ms}ms")]
    Timeout { path: String, timeout_ms: u64 },

    #[error("{path} returned a malformed payload: {message}")]
    Malformed { path: String, message: String },
}

impl FetchError {
    /// Outages (transport, status, timeout) are recoverable by the degrade
    /// policies; a malformed payload is not.
    pub fn is_unavailable(&self) -> bool {
        !matches!(self, FetchError::Malformed { .. })
    }

    /// Short label for logs and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Transport { .. } => "transport",
            FetchError::Status { .. } => "status",
            FetchError::Timeout { .. } => "timeout",
            FetchError::Malformed { .. } => "malformed",
        }
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to fetch mixed content")]
    Feed(#[from] FetchError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let ApiError::Feed(ref cause) = self;
        tracing::error!(target: "feed", error = %cause, "mixed feed request failed");

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}
