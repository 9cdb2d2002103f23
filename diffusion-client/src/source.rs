//! Backend seams
//!
//! The poller, prober, and session only need a narrow slice of the
//! backend. These traits describe those slices so the components can be
//! driven by [`DiffusionClient`] in production and by scripted fakes in
//! tests.

use async_trait::async_trait;
use diffusion_core::domain::job::JobStatus;
use diffusion_core::dto::generation::{GenerateImageResponse, GenerationRequest};
use diffusion_core::dto::health::HealthResponse;

use crate::DiffusionClient;
use crate::error::Result;

/// Something that can report the status of a job
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Fetches the latest status snapshot for `job_id`
    async fn fetch_status(&self, job_id: &str) -> Result<JobStatus>;
}

/// Something that can report backend liveness
#[async_trait]
pub trait HealthSource: Send + Sync {
    async fn check_health(&self) -> Result<HealthResponse>;
}

/// Something that accepts generation requests
#[async_trait]
pub trait JobSubmitter: Send + Sync {
    async fn submit(&self, request: &GenerationRequest) -> Result<GenerateImageResponse>;
}

#[async_trait]
impl StatusSource for DiffusionClient {
    async fn fetch_status(&self, job_id: &str) -> Result<JobStatus> {
        self.get_job_status(job_id).await
    }
}

#[async_trait]
impl HealthSource for DiffusionClient {
    async fn check_health(&self) -> Result<HealthResponse> {
        DiffusionClient::check_health(self).await
    }
}

#[async_trait]
impl JobSubmitter for DiffusionClient {
    async fn submit(&self, request: &GenerationRequest) -> Result<GenerateImageResponse> {
        self.generate_image(request).await
    }
}
