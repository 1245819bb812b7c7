// SPDX-License-Identifier: MIT
//! Baggage service: correlation context on every traced route, nested spans, a route
//! that fails before finishing its work, and a text-generation route.
use std::time::Duration;

use axum::extract::State;
use axum::routing::get;
use axum::{middleware, Json, Router};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, info_span, instrument, Instrument};

use super::{detached, health, AppState, Message};
use crate::context::propagate_request_context;
use crate::error::AppError;
use crate::llm::{HELLO_MODEL, HELLO_PROMPT};

/// `/health` is added after the layers so liveness probes produce no spans.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(read_root))
        .route("/error", get(raise_error))
        .route("/openai_hello", get(openai_hello))
        .layer(middleware::from_fn(propagate_request_context))
        .layer(TraceLayer::new_for_http())
        .route("/health", get(health))
        .with_state(state)
}

async fn read_root(State(state): State<AppState>) -> Result<Json<Message>, AppError> {
    detached(root_work(state)).await?;
    Ok(Json(Message::hello()))
}

#[instrument(name = "root_handler", skip_all)]
async fn root_work(state: AppState) {
    state.counters.started();
    info!("Handling root request");
    tokio::time::sleep(state.work_delay).await;
    simulated_work(&state).await;
    state.counters.finished();
}

#[instrument(skip_all)]
async fn simulated_work(state: &AppState) {
    state.counters.started();
    info!(task = "simulated_work", "starting task");
    tokio::time::sleep(state.work_delay).await;
    debug!(task = "simulated_work", "completed task");
    state.counters.finished();
}

/// `finished` is never reached: the started/finished asymmetry is what this route shows.
async fn raise_error(State(state): State<AppState>) -> Result<Json<Message>, AppError> {
    detached(async move {
        state.counters.started();
        failing_operation(state.work_delay).await?;
        state.counters.finished();
        Ok::<_, AppError>(Json(Message::hello()))
    })
    .await?
}

#[instrument(skip_all, err)]
async fn failing_operation(delay: Duration) -> Result<(), AppError> {
    info!("Starting an operation that will not finish");
    tokio::time::sleep(delay).await;
    Err(AppError::Demonstration)
}

async fn openai_hello(State(state): State<AppState>) -> Result<Json<Message>, AppError> {
    let text = detached(async move {
        state
            .generator
            .generate(HELLO_MODEL, HELLO_PROMPT)
            .instrument(info_span!("openai_request", model = HELLO_MODEL))
            .await
    })
    .await??;
    info!(chars = text.len(), "Text generation returned");
    Ok(Json(Message::new(text)))
}
