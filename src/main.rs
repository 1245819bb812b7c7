// SPDX-License-Identifier: MIT
//! Baggage service: `/`, `/error`, `/openai_hello`, `/health`.
use std::sync::Arc;

use anyhow::Result;
use otel_demo_services::config::ServiceConfig;
use otel_demo_services::counters::RequestCounters;
use otel_demo_services::llm::OpenAiClient;
use otel_demo_services::routes::{baggage, AppState};
use otel_demo_services::server;
use otel_demo_services::telemetry::{init_telemetry, TelemetryConfig};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let telemetry = init_telemetry(TelemetryConfig::from_env("otel-demo"))?;
    let config = ServiceConfig::from_env()?;
    info!(bind = %config.bind_addr, "logging is configured");

    if config.openai_api_key.is_none() {
        warn!("OPENAI_API_KEY is not set; /openai_hello will fail");
    }
    let generator = OpenAiClient::new(
        config.openai_api_key.clone(),
        config.openai_base_url.clone(),
        config.openai_timeout,
    )?;

    let state = AppState {
        counters: RequestCounters::new(&telemetry.meter()),
        generator: Arc::new(generator),
        work_delay: config.work_delay,
    };

    server::serve(baggage::router(state), config.bind_addr).await?;

    info!("shutting down");
    telemetry.shutdown()?;
    Ok(())
}
