//! Scripted backend used by the unit tests

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use diffusion_core::domain::job::{JobState, JobStatus};
use diffusion_core::dto::generation::{GenerateImageResponse, GenerationRequest};
use diffusion_core::dto::health::HealthResponse;
use tokio::sync::Notify;

use crate::error::{ClientError, Result};
use crate::source::{HealthSource, JobSubmitter, StatusSource};

/// One scripted answer to a status fetch
#[derive(Debug, Clone)]
pub(crate) enum Reply {
    State(JobState),
    Failed(&'static str),
    Unreachable,
}

pub(crate) fn job_status(job_id: &str, state: JobState, error: Option<&str>) -> JobStatus {
    let created_at = NaiveDate::from_ymd_opt(2024, 5, 1)
        .and_then(|d| d.and_hms_opt(10, 0, 0))
        .unwrap();
    JobStatus {
        job_id: job_id.to_string(),
        image_name: format!("img_{job_id}"),
        status: state,
        prompt: "a cat".to_string(),
        width: 1024,
        height: 1024,
        steps: 9,
        created_at,
        completed_at: state.is_terminal().then_some(created_at),
        error_message: error.map(str::to_string),
    }
}

/// Scripted backend
///
/// Each job id has a queue of replies; the last reply repeats once the
/// queue is down to one entry.
#[derive(Default)]
pub(crate) struct FakeBackend {
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    status_calls: Mutex<Vec<String>>,
    health: Mutex<VecDeque<bool>>,
    health_calls: AtomicUsize,
    submit_calls: AtomicUsize,
    next_job: Mutex<Option<String>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    pub(crate) fetch_started: Notify,
}

impl FakeBackend {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn script(&self, job_id: &str, replies: impl IntoIterator<Item = Reply>) {
        self.replies
            .lock()
            .unwrap()
            .insert(job_id.to_string(), replies.into_iter().collect());
    }

    pub(crate) fn script_health(&self, results: impl IntoIterator<Item = bool>) {
        *self.health.lock().unwrap() = results.into_iter().collect();
    }

    /// Job id handed out by the next successful submission
    pub(crate) fn accept_next(&self, job_id: &str) {
        *self.next_job.lock().unwrap() = Some(job_id.to_string());
    }

    /// Makes fetches for `job_id` wait until the returned handle is notified
    pub(crate) fn hold(&self, job_id: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(job_id.to_string(), Arc::clone(&gate));
        gate
    }

    pub(crate) fn status_calls(&self) -> Vec<String> {
        self.status_calls.lock().unwrap().clone()
    }

    pub(crate) fn status_calls_for(&self, job_id: &str) -> usize {
        self.status_calls()
            .iter()
            .filter(|id| id.as_str() == job_id)
            .count()
    }

    pub(crate) fn health_calls(&self) -> usize {
        self.health_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn submit_calls(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    fn next_reply(&self, job_id: &str) -> Reply {
        let mut replies = self.replies.lock().unwrap();
        match replies.get_mut(job_id) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) => queue.front().cloned().unwrap_or(Reply::Unreachable),
            None => Reply::Unreachable,
        }
    }
}

#[async_trait]
impl StatusSource for FakeBackend {
    async fn fetch_status(&self, job_id: &str) -> Result<JobStatus> {
        self.status_calls.lock().unwrap().push(job_id.to_string());

        let gate = self.gates.lock().unwrap().get(job_id).cloned();
        if let Some(gate) = gate {
            self.fetch_started.notify_one();
            gate.notified().await;
        }

        match self.next_reply(job_id) {
            Reply::State(state) => Ok(job_status(job_id, state, None)),
            Reply::Failed(message) => Ok(job_status(job_id, JobState::Failed, Some(message))),
            Reply::Unreachable => Err(ClientError::api_error(503, "backend unavailable")),
        }
    }
}

#[async_trait]
impl HealthSource for FakeBackend {
    async fn check_health(&self) -> Result<HealthResponse> {
        self.health_calls.fetch_add(1, Ordering::SeqCst);
        let healthy = self.health.lock().unwrap().pop_front().unwrap_or(true);

        if healthy {
            Ok(HealthResponse {
                status: "healthy".to_string(),
            })
        } else {
            Err(ClientError::api_error(502, "bad gateway"))
        }
    }
}

#[async_trait]
impl JobSubmitter for FakeBackend {
    async fn submit(&self, _request: &GenerationRequest) -> Result<GenerateImageResponse> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);

        match self.next_job.lock().unwrap().take() {
            Some(job_id) => Ok(GenerateImageResponse {
                image_name: format!("img_{job_id}"),
                job_id,
                status: "generating".to_string(),
            }),
            None => Err(ClientError::api_error(500, "generator offline")),
        }
    }
}
