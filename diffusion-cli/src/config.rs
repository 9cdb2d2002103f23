//! Configuration module
//!
//! Connection and timing settings shared by every command.

use std::time::Duration;

use anyhow::Result;
use diffusion_client::DiffusionClient;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the generation backend
    pub api_url: String,

    /// Delay between job status polls
    pub poll_interval: Duration,

    /// Delay between health checks
    pub health_interval: Duration,

    /// Per-request HTTP timeout
    pub request_timeout: Duration,
}

impl Config {
    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_url.is_empty() {
            anyhow::bail!("api_url cannot be empty");
        }

        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            anyhow::bail!("api_url must start with http:// or https://");
        }

        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if self.health_interval.is_zero() {
            anyhow::bail!("health_interval must be greater than 0");
        }

        if self.request_timeout.is_zero() {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        Ok(())
    }

    /// Builds an HTTP client from these settings
    pub fn client(&self) -> Result<DiffusionClient> {
        Ok(DiffusionClient::with_timeout(
            &self.api_url,
            self.request_timeout,
        )?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000".to_string(),
            poll_interval: Duration::from_millis(2000),
            health_interval: Duration::from_millis(10_000),
            request_timeout: Duration::from_secs(30),
        }
    }
}
