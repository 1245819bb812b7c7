// SPDX-License-Identifier: MIT
//! HTTP routers for the two demo services.
//!
//! * [`basic`] – single traced route keyed by `X-Trace-Id`.
//! * [`baggage`] – correlation baggage, nested spans, a failing route and a text-generation route.
//!
//! `/health` is shared and always returns an empty 200.
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use opentelemetry::trace::FutureExt;
use serde::{Deserialize, Serialize};
use tracing::{Instrument, Span};

use crate::counters::RequestCounters;
use crate::error::AppError;
use crate::llm::TextGenerator;

pub mod baggage;
pub mod basic;

/// JSON body returned by every non-health route.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn hello() -> Self {
        Self::new("Hello, World!")
    }
}

/// Dependencies injected into the baggage service's handlers.
#[derive(Clone)]
pub struct AppState {
    pub counters: RequestCounters,
    pub generator: Arc<dyn TextGenerator>,
    /// Simulated work per traced block.
    pub work_delay: Duration,
}

/// Liveness probe. No span, no counters, empty body.
pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Run handler work on its own task so a caller hanging up does not cancel it.
///
/// The work keeps the current span and OpenTelemetry context (baggage included).
pub(crate) async fn detached<F>(work: F) -> Result<F::Output, AppError>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    let work = work.instrument(Span::current()).with_current_context();
    Ok(tokio::spawn(work).await?)
}
