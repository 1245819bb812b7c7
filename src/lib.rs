// SPDX-License-Identifier: MIT
//! Two small HTTP services exercising `tracing` + OpenTelemetry.
//!
//! * The basic service ([`routes::basic`]) wraps its single route in one span and
//!   logs the caller's `X-Trace-Id`.
//! * The baggage service ([`routes::baggage`]) scopes `X-Correlation-ID` / `X-UserID`
//!   to each request, nests spans around simulated work, fails on purpose on `/error`
//!   and forwards a fixed prompt to a text-generation API on `/openai_hello`.
//!
//! Both count units of work with a started/finished counter pair ([`counters`]) and
//! share the telemetry bootstrap in [`telemetry`].
//!
//! # Feature Flags
//! * `console-log` (default) – compact console formatter (file/line/thread id).
//! * `otlp-log` – OTLP log exporter; tracing events are bridged into logs.
//!
//! # Quick Start
//! ```no_run
//! use otel_demo_services::counters::RequestCounters;
//! use otel_demo_services::routes::basic;
//! use otel_demo_services::telemetry::{init_telemetry, TelemetryConfig};
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let handle = init_telemetry(TelemetryConfig::default())?;
//!     let app = basic::router(RequestCounters::new(&handle.meter()));
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//!     axum::serve(listener, app).await?;
//!     handle.shutdown()?;
//!     Ok(())
//! }
//! ```
pub mod config;
pub mod context;
pub mod counters;
pub mod error;
pub mod llm;
pub mod routes;
pub mod server;
pub mod telemetry;
