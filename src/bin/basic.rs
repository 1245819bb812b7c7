// SPDX-License-Identifier: MIT
//! Basic service: `/` and `/health`.
use anyhow::Result;
use otel_demo_services::config::ServiceConfig;
use otel_demo_services::counters::RequestCounters;
use otel_demo_services::routes::basic;
use otel_demo_services::server;
use otel_demo_services::telemetry::{init_telemetry, TelemetryConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let telemetry = init_telemetry(TelemetryConfig::from_env("otel-demo-basic"))?;
    info!("Logging is configured.");

    let config = ServiceConfig::from_env()?;
    let app = basic::router(RequestCounters::new(&telemetry.meter()));
    server::serve(app, config.bind_addr).await?;

    info!("shutting down");
    telemetry.shutdown()?;
    Ok(())
}
