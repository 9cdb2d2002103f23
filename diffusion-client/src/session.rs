//! Generation session
//!
//! Validates a request, submits it, and hands the resulting job to the
//! poller. A request that fails validation never reaches the network, and
//! a failed submission leaves the poller exactly as it was.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use diffusion_core::dto::generation::{GenerateImageResponse, GenerationRequest};
use tracing::{error, info};

use crate::DiffusionClient;
use crate::error::SubmitError;
use crate::scheduler::JobPoller;
use crate::source::{JobSubmitter, StatusSource};

pub struct GenerationSession {
    submitter: Arc<dyn JobSubmitter>,
    poller: JobPoller,
    submitting: AtomicUsize,
}

impl GenerationSession {
    /// Creates a session backed by a single HTTP client
    pub fn new(client: Arc<DiffusionClient>, poll_interval: Duration) -> Self {
        Self::with_backend(client.clone(), client, poll_interval)
    }

    pub fn with_backend(
        submitter: Arc<dyn JobSubmitter>,
        status: Arc<dyn StatusSource>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            submitter,
            poller: JobPoller::new(status, poll_interval),
            submitting: AtomicUsize::new(0),
        }
    }

    /// Validates and submits `request`, then starts polling the new job
    ///
    /// Submitting while another job is still polling switches the poller
    /// to the new job.
    pub async fn submit(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerateImageResponse, SubmitError> {
        request.validate()?;

        let _submitting = InFlight::enter(&self.submitting);
        let response = self.submitter.submit(&request).await.map_err(|e| {
            error!("Failed to start image generation: {}", e);
            SubmitError::from(e)
        })?;

        info!(
            "Started job {} (image {})",
            response.job_id, response.image_name
        );
        self.poller.watch(Some(response.job_id.clone()));

        Ok(response)
    }

    pub fn poller(&self) -> &JobPoller {
        &self.poller
    }

    /// True while a submission is in flight or the current job is polling
    pub fn is_generating(&self) -> bool {
        self.submitting.load(Ordering::SeqCst) > 0 || self.poller.is_polling()
    }
}

/// Counts one in-flight submission; released on every exit path
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
