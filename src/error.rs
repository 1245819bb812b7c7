// SPDX-License-Identifier: MIT
//! Handler error type.
//!
//! Nothing is caught or retried; every variant becomes a 500 so the caller sees the
//! failure and the surrounding spans close with the error event recorded.
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::llm::LlmError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Raised unconditionally by `/error` to show an unfinished operation in traces.
    #[error("demonstration failure raised before the operation finished")]
    Demonstration,

    #[error("text generation failed: {0}")]
    TextGeneration(#[from] LlmError),

    #[error("handler task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}
