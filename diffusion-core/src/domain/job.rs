//! Job domain types

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of a generation job as reported by `GET /status/{job_id}`
///
/// Created by the backend at submission time with `status = generating`,
/// it transitions exactly once to a terminal state and is immutable after.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStatus {
    pub job_id: String,
    pub image_name: String,
    pub status: JobState,
    pub prompt: String,
    pub width: u32,
    pub height: u32,
    #[serde(rename = "num_inference_steps")]
    pub steps: u32,
    /// Naive UTC timestamp, as written by the backend
    pub created_at: NaiveDateTime,
    pub completed_at: Option<NaiveDateTime>,
    pub error_message: Option<String>,
}

impl JobStatus {
    /// Whether the job has reached `completed` or `failed`
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn created_at_utc(&self) -> DateTime<Utc> {
        self.created_at.and_utc()
    }

    pub fn completed_at_utc(&self) -> Option<DateTime<Utc>> {
        self.completed_at.map(|t| t.and_utc())
    }

    /// Wall-clock generation time, once the job has completed
    pub fn duration(&self) -> Option<chrono::Duration> {
        self.completed_at
            .map(|done| done.signed_duration_since(self.created_at))
    }

    /// Human readable failure reason for a failed job
    pub fn failure_reason(&self) -> Option<&str> {
        match self.status {
            JobState::Failed => Some(self.error_message.as_deref().unwrap_or("Generation failed")),
            _ => None,
        }
    }
}

/// Job lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Generating,
    Completed,
    Failed,
}

impl JobState {
    /// Terminal states never transition again
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Completed | JobState::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobState::Generating => "generating",
            JobState::Completed => "completed",
            JobState::Failed => "failed",
        }
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
