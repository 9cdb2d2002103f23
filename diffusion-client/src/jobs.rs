//! Generation job endpoints

use crate::DiffusionClient;
use crate::error::{ClientError, Result};
use diffusion_core::domain::job::JobStatus;
use diffusion_core::dto::generation::{GenerateImageResponse, GenerationRequest};
use tracing::debug;

impl DiffusionClient {
    // =============================================================================
    // Job Lifecycle
    // =============================================================================

    /// Submit a generation request
    ///
    /// The request is sent as-is; callers that want local validation should
    /// go through [`crate::GenerationSession::submit`].
    ///
    /// # Returns
    /// The backend-issued job handle and image name
    pub async fn generate_image(&self, req: &GenerationRequest) -> Result<GenerateImageResponse> {
        let url = self.url("/generate-image");
        debug!(
            "Submitting {}x{} generation ({} steps)",
            req.width, req.height, req.steps
        );
        let response = self.client.post(&url).json(req).send().await?;

        self.handle_response(response).await
    }

    /// Get the current status of a job
    ///
    /// A 404 from the backend is reported as [`ClientError::NotFound`].
    pub async fn get_job_status(&self, job_id: &str) -> Result<JobStatus> {
        let url = self.url(&format!("/status/{}", job_id));
        let response = self.client.get(&url).send().await?;

        match self.handle_response(response).await {
            Err(e) if e.is_not_found() => Err(ClientError::NotFound(format!("job {}", job_id))),
            other => other,
        }
    }

    // =============================================================================
    // Images
    // =============================================================================

    /// URL of the generated image for a job
    ///
    /// Only meaningful once the job has completed.
    pub fn image_url(&self, job_id: &str) -> String {
        self.url(&format!("/image/{}", job_id))
    }

    /// Download the generated image bytes for a job
    pub async fn download_image(&self, job_id: &str) -> Result<Vec<u8>> {
        let response = self.client.get(self.image_url(job_id)).send().await?;

        self.handle_bytes_response(response).await
    }
}
