// SPDX-License-Identifier: MIT
//! Telemetry initialization (traces and metrics always, optional console logs & OTLP logs).
//!
//! Both services share this setup. The public API stays small:
//!
//! * [`TelemetryConfig`] – endpoint & resource metadata, sourced from the environment.
//! * [`init_telemetry`] – builds providers, installs the global tracer/meter and the subscriber.
//! * [`TelemetryHandle`] – hands out the service [`Meter`] and performs explicit shutdown/flush.
//!
//! Feature flags (Cargo features) influence behavior:
//!
//! * `console-log` (default) – add a compact console formatting layer.
//! * `otlp-log` – enable OTLP log exporter + tracing bridge (converts tracing events to logs).
//!
//! # Example
//! ```no_run
//! use otel_demo_services::telemetry::{init_telemetry, TelemetryConfig};
//! fn main() -> anyhow::Result<()> {
//!     let handle = init_telemetry(TelemetryConfig::default())?;
//!     let _meter = handle.meter();
//!     // ... serve requests ...
//!     handle.shutdown()?; // ensure final spans and metric points are exported
//!     Ok(())
//! }
//! ```
//!
//! # Shutdown
//! Call [`TelemetryHandle::shutdown`] before exiting the Tokio runtime to flush any remaining batches.
//! Shutdown aggregates exporter errors into a single `anyhow::Error`.
use anyhow::Result;
use opentelemetry::metrics::{Meter, MeterProvider};
use opentelemetry::{global, KeyValue};
#[cfg(feature = "otlp-log")]
use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
#[cfg(feature = "otlp-log")]
use opentelemetry_otlp::LogExporter;
use opentelemetry_otlp::{MetricExporter, Protocol, SpanExporter, WithExportConfig};
#[cfg(feature = "otlp-log")]
use opentelemetry_sdk::logs::SdkLoggerProvider;
use opentelemetry_sdk::metrics::SdkMeterProvider;
use opentelemetry_sdk::trace::SdkTracerProvider;
use opentelemetry_sdk::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
#[cfg(feature = "console-log")]
use tracing_subscriber::fmt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Registry};

/// Instrumentation scope used for the tracer and the service meter.
pub const INSTRUMENTATION_SCOPE: &str = "otel-demo-services";

/// Configuration used when initializing telemetry.
///
/// Values are sourced from environment variables if available:
/// * `OTEL_EXPORTER_OTLP_ENDPOINT` – base endpoint (e.g. `http://localhost:4318`).
/// * `OTEL_SERVICE_NAME` – service name resource attribute.
/// * `RUST_ENV` – deployment environment (added as `deployment.environment`).
#[derive(Clone, Debug)]
pub struct TelemetryConfig {
    /// Base OTLP endpoint (without per-signal suffix). Example: `http://localhost:4318`.
    pub endpoint: String,
    /// Service name reported in resource attributes (`service.name`).
    pub service_name: String,
    /// Service version reported in resource attributes (`service.version`).
    pub service_version: String,
}

impl TelemetryConfig {
    /// Read the config from the environment, falling back to `default_service_name`
    /// when `OTEL_SERVICE_NAME` is unset.
    pub fn from_env(default_service_name: &str) -> Self {
        Self {
            endpoint: std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:4318".to_string()),
            service_name: std::env::var("OTEL_SERVICE_NAME")
                .unwrap_or_else(|_| default_service_name.to_string()),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    fn signal_endpoint(&self, signal: &str) -> String {
        format!("{}/v1/{}", self.endpoint.trim_end_matches('/'), signal)
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self::from_env(env!("CARGO_PKG_NAME"))
    }
}

/// Handle owning the installed telemetry providers.
///
/// Dropping the handle without calling [`TelemetryHandle::shutdown`] may lose the final
/// batches. Call `shutdown()` at a controlled point, typically after the server stops.
pub struct TelemetryHandle {
    tracer_provider: SdkTracerProvider,
    meter_provider: SdkMeterProvider,
    #[cfg(feature = "otlp-log")]
    logger_provider: SdkLoggerProvider,
}

impl TelemetryHandle {
    /// Meter from which the service builds its counters.
    pub fn meter(&self) -> Meter {
        self.meter_provider.meter(INSTRUMENTATION_SCOPE)
    }

    /// Flush and shutdown all configured telemetry providers.
    ///
    /// Returns `Ok(())` if every provider shutdown cleanly, otherwise a combined
    /// error naming each failing component.
    pub fn shutdown(self) -> Result<()> {
        let mut errs = Vec::new();
        if let Err(e) = self.tracer_provider.shutdown() {
            errs.push(format!("tracer: {e}"));
        }
        if let Err(e) = self.meter_provider.shutdown() {
            errs.push(format!("meter: {e}"));
        }
        #[cfg(feature = "otlp-log")]
        if let Err(e) = self.logger_provider.shutdown() {
            errs.push(format!("logger: {e}"));
        }
        if errs.is_empty() {
            Ok(())
        } else {
            anyhow::bail!(errs.join(", "))
        }
    }
}

/// Initialize tracing, metrics (and optionally logging) telemetry for a service.
///
/// Installs a global tracer provider and meter provider, then configures a subscriber
/// registry composed of layers (console formatting, OTLP log bridge, OpenTelemetry
/// span layer) depending on enabled Cargo features.
///
/// # Errors
/// Returns an error if any exporter builder fails (e.g. invalid endpoint URL), or if
/// a global subscriber is already installed.
pub fn init_telemetry(cfg: TelemetryConfig) -> Result<TelemetryHandle> {
    let resource = Resource::builder()
        .with_service_name(cfg.service_name.clone())
        .with_attributes([
            KeyValue::new("service.version", cfg.service_version.clone()),
            KeyValue::new(
                "deployment.environment",
                std::env::var("RUST_ENV").unwrap_or_else(|_| "dev".into()),
            ),
        ])
        .build();

    // Exporters (HTTP binary OTLP)
    let span_exporter = SpanExporter::builder()
        .with_http()
        .with_protocol(Protocol::HttpBinary)
        .with_endpoint(cfg.signal_endpoint("traces"))
        .build()?;

    let metric_exporter = MetricExporter::builder()
        .with_http()
        .with_protocol(Protocol::HttpBinary)
        .with_endpoint(cfg.signal_endpoint("metrics"))
        .build()?;

    #[cfg(feature = "otlp-log")]
    let log_exporter = LogExporter::builder()
        .with_http()
        .with_protocol(Protocol::HttpBinary)
        .with_endpoint(cfg.signal_endpoint("logs"))
        .build()?;

    let tracer_provider = SdkTracerProvider::builder()
        .with_batch_exporter(span_exporter)
        .with_resource(resource.clone())
        .build();
    global::set_tracer_provider(tracer_provider.clone());

    let meter_provider = SdkMeterProvider::builder()
        .with_periodic_exporter(metric_exporter)
        .with_resource(resource.clone())
        .build();
    global::set_meter_provider(meter_provider.clone());

    #[cfg(feature = "otlp-log")]
    let logger_provider = SdkLoggerProvider::builder()
        .with_batch_exporter(log_exporter)
        .with_resource(resource.clone())
        .build();

    #[cfg(feature = "otlp-log")]
    let bridge_layer = OpenTelemetryTracingBridge::new(&logger_provider);

    let otel_trace_layer = OpenTelemetryLayer::new(global::tracer(INSTRUMENTATION_SCOPE));

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    #[cfg(feature = "console-log")]
    let fmt_layer_plain = fmt::layer()
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .compact();

    #[cfg(all(feature = "console-log", feature = "otlp-log"))]
    Registry::default()
        .with(filter)
        .with(fmt_layer_plain)
        .with(bridge_layer)
        .with(otel_trace_layer)
        .try_init()?;

    #[cfg(all(feature = "console-log", not(feature = "otlp-log")))]
    Registry::default()
        .with(filter)
        .with(fmt_layer_plain)
        .with(otel_trace_layer)
        .try_init()?;

    #[cfg(all(not(feature = "console-log"), feature = "otlp-log"))]
    Registry::default()
        .with(filter)
        .with(bridge_layer)
        .with(otel_trace_layer)
        .try_init()?;

    #[cfg(all(not(feature = "console-log"), not(feature = "otlp-log")))]
    Registry::default()
        .with(filter)
        .with(otel_trace_layer)
        .try_init()?;

    Ok(TelemetryHandle {
        tracer_provider,
        meter_provider,
        #[cfg(feature = "otlp-log")]
        logger_provider,
    })
}
