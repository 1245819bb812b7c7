// SPDX-License-Identifier: MIT
//! Service configuration sourced from the environment.
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};

/// Default OpenAI-compatible API base URL.
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Settings shared by both demo services.
///
/// Environment variables:
/// * `BIND_ADDR` – listen address (default `0.0.0.0:8000`).
/// * `WORK_DELAY_MS` – simulated work per traced block (default `100`).
/// * `OPENAI_API_KEY` – bearer token for the text-generation API (optional).
/// * `OPENAI_BASE_URL` – API base URL (default [`OPENAI_BASE_URL`]).
/// * `OPENAI_TIMEOUT_SECS` – request timeout for the text-generation API (default `60`).
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub bind_addr: SocketAddr,
    pub work_delay: Duration,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_timeout: Duration,
}

impl ServiceConfig {
    /// Build the config from environment variables.
    ///
    /// # Errors
    /// Returns an error when a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let bind_addr = env_or("BIND_ADDR", "0.0.0.0:8000")
            .parse()
            .context("BIND_ADDR is not a socket address")?;
        let work_delay_ms: u64 = env_or("WORK_DELAY_MS", "100")
            .parse()
            .context("WORK_DELAY_MS is not an integer")?;
        let timeout_secs: u64 = env_or("OPENAI_TIMEOUT_SECS", "60")
            .parse()
            .context("OPENAI_TIMEOUT_SECS is not an integer")?;

        Ok(Self {
            bind_addr,
            work_delay: Duration::from_millis(work_delay_ms),
            openai_api_key: std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
            openai_base_url: env_or("OPENAI_BASE_URL", OPENAI_BASE_URL),
            openai_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            work_delay: Duration::from_millis(100),
            openai_api_key: None,
            openai_base_url: OPENAI_BASE_URL.to_string(),
            openai_timeout: Duration::from_secs(60),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
