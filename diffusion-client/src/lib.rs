//! Diffusion HTTP Client
//!
//! A type-safe client for an image-generation backend, plus the two
//! timer-driven components that sit on top of it:
//!
//! - [`JobPoller`]: follows one generation job until it completes or fails
//! - [`HealthProber`]: keeps a best-effort liveness signal for the backend
//!
//! [`GenerationSession`] ties validation, submission, and polling together.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use diffusion_client::{DiffusionClient, GenerationSession};
//! use diffusion_core::dto::generation::GenerationRequest;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Arc::new(DiffusionClient::new("http://localhost:8000"));
//!     let session = GenerationSession::new(client, Duration::from_secs(2));
//!
//!     let job = session.submit(GenerationRequest::new("a cat")).await?;
//!     let state = session.poller().wait_until_settled().await;
//!
//!     println!("job {} finished: {:?}", job.job_id, state.phase());
//!     Ok(())
//! }
//! ```

pub mod error;
mod health;
mod jobs;
pub mod scheduler;
mod session;
mod source;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use error::{ClientError, Result, SubmitError};
pub use scheduler::{HealthProbe, HealthProber, JobPoller, PollPhase, PollState};
pub use session::GenerationSession;
pub use source::{HealthSource, JobSubmitter, StatusSource};

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;

/// HTTP client for the generation backend
///
/// Covers the four endpoints of the backend contract:
/// - `POST /generate-image`
/// - `GET /status/{job_id}`
/// - `GET /health`
/// - `GET /image/{job_id}`
#[derive(Debug, Clone)]
pub struct DiffusionClient {
    /// Base URL of the backend (e.g., "http://localhost:8000")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl DiffusionClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the backend API (e.g., "http://localhost:8000")
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Create a new client whose requests give up after `timeout`
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(base_url, client))
    }

    /// Get the base URL of the backend
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let response = Self::check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response carrying a binary body
    async fn handle_bytes_response(&self, response: reqwest::Response) -> Result<Vec<u8>> {
        let response = Self::check_status(response).await?;
        let body = response.bytes().await?;

        Ok(body.to_vec())
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(response)
    }
}
