// SPDX-License-Identifier: MIT
//! Per-request correlation context.
//!
//! [`propagate_request_context`] reads `X-Correlation-ID` and `X-UserID`, then for the
//! lifetime of the request future:
//!
//! * stores a [`RequestContext`] in the request extensions,
//! * runs the rest of the stack inside a `request_context` span whose fields tag every
//!   log line emitted below it,
//! * attaches an OpenTelemetry [`Context`] carrying both values as baggage.
//!
//! Nothing outlives the request; concurrent requests each get their own span and context.
use axum::extract::Request;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use opentelemetry::baggage::BaggageExt;
use opentelemetry::trace::FutureExt;
use opentelemetry::{Context, KeyValue};
use tracing::field::{display, Empty};
use tracing::Instrument;

pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";
pub const USER_ID_HEADER: &str = "x-userid";

const CORRELATION_ID_KEY: &str = "correlation_id";
const USER_ID_KEY: &str = "user_id";

/// Correlation values supplied by the caller. Missing or non-UTF-8 headers are `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub correlation_id: Option<String>,
    pub user_id: Option<String>,
}

impl RequestContext {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            correlation_id: header_str(headers, CORRELATION_ID_HEADER),
            user_id: header_str(headers, USER_ID_HEADER),
        }
    }

    /// Read the context back from the baggage of the current OpenTelemetry context.
    pub fn current() -> Self {
        let cx = Context::current();
        let baggage = cx.baggage();
        Self {
            correlation_id: baggage.get(CORRELATION_ID_KEY).map(|v| v.to_string()),
            user_id: baggage.get(USER_ID_KEY).map(|v| v.to_string()),
        }
    }

    fn baggage(&self) -> Vec<KeyValue> {
        let mut entries = Vec::with_capacity(2);
        if let Some(id) = &self.correlation_id {
            entries.push(KeyValue::new(CORRELATION_ID_KEY, id.clone()));
        }
        if let Some(id) = &self.user_id {
            entries.push(KeyValue::new(USER_ID_KEY, id.clone()));
        }
        entries
    }

    fn span(&self) -> tracing::Span {
        let span = tracing::info_span!("request_context", correlation_id = Empty, user_id = Empty);
        if let Some(id) = &self.correlation_id {
            span.record(CORRELATION_ID_KEY, display(id));
        }
        if let Some(id) = &self.user_id {
            span.record(USER_ID_KEY, display(id));
        }
        span
    }
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

/// Middleware scoping a [`RequestContext`] to one request.
pub async fn propagate_request_context(mut request: Request, next: Next) -> Response {
    let ctx = RequestContext::from_headers(request.headers());
    let otel_cx = Context::current_with_baggage(ctx.baggage());

    // Create the span while the baggage context is current so the exported span inherits it.
    let span = {
        let _attached = otel_cx.clone().attach();
        ctx.span()
    };
    request.extensions_mut().insert(ctx);

    next.run(request).instrument(span).with_context(otel_cx).await
}
