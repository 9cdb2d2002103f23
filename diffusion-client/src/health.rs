//! Health endpoint

use crate::DiffusionClient;
use crate::error::Result;
use diffusion_core::dto::health::HealthResponse;
use tracing::debug;

impl DiffusionClient {
    /// Query `GET /health`
    ///
    /// Any non-2xx status is returned as an error. A 2xx answer counts as
    /// healthy even when its body is not `{"status": ...}`; the raw body is
    /// then reported as the status.
    pub async fn check_health(&self) -> Result<HealthResponse> {
        let response = self.client.get(self.url("/health")).send().await?;
        let body = Self::check_status(response).await?.text().await?;

        Ok(parse_health_body(&body))
    }
}

fn parse_health_body(body: &str) -> HealthResponse {
    serde_json::from_str(body).unwrap_or_else(|e| {
        debug!("Health body is not JSON ({}), using it verbatim", e);
        HealthResponse {
            status: body.trim().to_string(),
        }
    })
}
