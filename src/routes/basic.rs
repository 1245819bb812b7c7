// SPDX-License-Identifier: MIT
//! Basic service: one span per request, keyed by an optional `X-Trace-Id` header.
use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::get;
use axum::{Json, Router};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, info_span};

use super::{health, Message};
use crate::counters::RequestCounters;

pub const TRACE_ID_HEADER: &str = "x-trace-id";

/// Every route, `/health` included, sits under the HTTP trace layer.
pub fn router(counters: RequestCounters) -> Router {
    Router::new()
        .route("/", get(read_root))
        .route("/health", get(health))
        .with_state(counters)
        .layer(TraceLayer::new_for_http())
}

async fn read_root(State(counters): State<RequestCounters>, headers: HeaderMap) -> Json<Message> {
    let trace_id = headers
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok());

    info_span!("This is a span").in_scope(|| {
        counters.started();
        info!("Received request with Trace ID: {}", trace_id.unwrap_or("None"));
        info!("Events are exported as part of the enclosing span");
        debug!("Debugging information here.");
        counters.finished();
    });

    Json(Message::hello())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counters::testing::MeterProbe;
    use crate::counters::{FINISHED_REQUEST_COUNTER, STARTED_REQUEST_COUNTER};
    use crate::routes::testing::{get, LogCapture};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn root_returns_hello_with_or_without_trace_id() {
        let probe = MeterProbe::new();
        let app = router(RequestCounters::new(&probe.meter()));

        for headers in [&[][..], &[("X-Trace-Id", "abc-123")][..]] {
            let (status, body) = get(app.clone(), "/", headers).await;
            assert_eq!(status, StatusCode::OK);
            let message: Message = serde_json::from_slice(&body).expect("json body");
            assert_eq!(message, Message::hello());
        }

        assert_eq!(probe.total(STARTED_REQUEST_COUNTER), 2);
        assert_eq!(probe.total(FINISHED_REQUEST_COUNTER), 2);
    }

    #[tokio::test]
    async fn trace_id_is_logged_inside_the_span() {
        let capture = LogCapture::default();
        let _guard = capture.install();
        let probe = MeterProbe::new();

        get(router(RequestCounters::new(&probe.meter())), "/", &[("X-Trace-Id", "abc-123")]).await;

        let lines = capture.lines();
        let received = lines
            .iter()
            .find(|line| line.contains("Received request with Trace ID: abc-123"))
            .expect("trace id log line");
        assert!(received.contains("This is a span"));
        assert!(lines.iter().any(|line| line.contains("Debugging information here.")));
    }

    #[tokio::test]
    async fn missing_trace_id_logs_none() {
        let capture = LogCapture::default();
        let _guard = capture.install();
        let probe = MeterProbe::new();

        get(router(RequestCounters::new(&probe.meter())), "/", &[]).await;

        assert!(capture
            .lines()
            .iter()
            .any(|line| line.contains("Received request with Trace ID: None")));
    }

    #[tokio::test]
    async fn health_is_empty_200() {
        let probe = MeterProbe::new();
        let (status, body) = get(router(RequestCounters::new(&probe.meter())), "/health", &[]).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
        assert_eq!(probe.total(STARTED_REQUEST_COUNTER), 0);
    }

    #[tokio::test]
    async fn health_sits_under_the_http_trace_layer() {
        let capture = LogCapture::default();
        let _guard = capture.install();
        let probe = MeterProbe::new();

        get(router(RequestCounters::new(&probe.meter())), "/health", &[]).await;

        let lines = capture.lines();
        assert!(
            lines.iter().any(|line| line.contains("tower_http::trace")),
            "no trace layer events: {lines:?}"
        );
    }
}
