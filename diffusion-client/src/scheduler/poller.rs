//! Job poller
//!
//! Follows a single generation job: fetches its status immediately, then
//! once per interval while the job is still generating. Polling ends on the
//! first terminal status or the first fetch error; errors are not retried.
//!
//! Pointing the poller at a different job (or at none) bumps a generation
//! counter and drops the previous polling task. A fetch result is written
//! only if the generation it was started under is still current, so a late
//! answer for an abandoned job can never land in the view of the new one.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use diffusion_core::domain::job::{JobState, JobStatus};
use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::clamp_interval;
use super::task::TaskGuard;
use crate::error::Result;
use crate::source::StatusSource;

/// Default delay between two status fetches
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// What a consumer of the poller sees
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollState {
    /// Job currently followed, `None` when idle
    pub job_id: Option<String>,
    /// Latest status fetched for `job_id`
    pub status: Option<JobStatus>,
    /// Whether more fetches are scheduled
    pub is_polling: bool,
    /// Transport error that stopped polling
    pub error: Option<String>,
    generation: u64,
}

/// Coarse lifecycle derived from a [`PollState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollPhase {
    Idle,
    Generating,
    Completed,
    Failed,
}

impl PollState {
    pub fn phase(&self) -> PollPhase {
        if self.job_id.is_none() {
            return PollPhase::Idle;
        }
        if self.error.is_some() {
            return PollPhase::Failed;
        }
        match self.status.as_ref().map(|s| s.status) {
            Some(JobState::Completed) => PollPhase::Completed,
            Some(JobState::Failed) => PollPhase::Failed,
            Some(JobState::Generating) | None => PollPhase::Generating,
        }
    }

    /// Message to show for a failed job: the transport error if polling
    /// broke down, otherwise the backend's own failure reason
    pub fn failure_message(&self) -> Option<&str> {
        self.error
            .as_deref()
            .or_else(|| self.status.as_ref().and_then(JobStatus::failure_reason))
    }
}

/// Whether the loop should fetch again
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Continue,
    Stop,
}

/// Polls the status of one job at a time
pub struct JobPoller {
    source: Arc<dyn StatusSource>,
    interval: Duration,
    state: Arc<watch::Sender<PollState>>,
    task: Mutex<Option<TaskGuard>>,
}

impl JobPoller {
    /// Creates an idle poller
    ///
    /// Intervals shorter than [`super::MIN_INTERVAL`] are raised to it.
    pub fn new(source: Arc<dyn StatusSource>, interval: Duration) -> Self {
        let (state, _) = watch::channel(PollState::default());
        Self {
            source,
            interval: clamp_interval(interval),
            state: Arc::new(state),
            task: Mutex::new(None),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Points the poller at `job_id`, or makes it idle with `None`
    ///
    /// Any polling for the previous job is cancelled before the new job's
    /// first fetch is issued. Must be called from within a tokio runtime.
    pub fn watch(&self, job_id: Option<String>) {
        let mut task = self.task.lock().unwrap_or_else(PoisonError::into_inner);
        task.take();

        let mut generation = 0;
        self.state.send_modify(|state| {
            state.generation += 1;
            generation = state.generation;
            state.job_id = job_id.clone();
            state.status = None;
            state.error = None;
            state.is_polling = job_id.is_some();
        });

        match job_id {
            Some(job_id) => {
                info!("Polling job {} every {:?}", job_id, self.interval);
                *task = Some(TaskGuard::spawn(poll_loop(
                    Arc::clone(&self.source),
                    Arc::clone(&self.state),
                    job_id,
                    generation,
                    self.interval,
                )));
            }
            None => debug!("Job poller idle"),
        }
    }

    /// Stops polling and forgets the current job
    pub fn stop(&self) {
        self.watch(None);
    }

    /// Current state snapshot
    pub fn state(&self) -> PollState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<PollState> {
        self.state.subscribe()
    }

    pub fn is_polling(&self) -> bool {
        self.state.borrow().is_polling
    }

    /// Waits until no more fetches are scheduled and returns the final state
    pub async fn wait_until_settled(&self) -> PollState {
        let mut rx = self.state.subscribe();
        match rx.wait_for(|state| !state.is_polling).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        }
    }
}

async fn poll_loop(
    source: Arc<dyn StatusSource>,
    state: Arc<watch::Sender<PollState>>,
    job_id: String,
    generation: u64,
    period: Duration,
) {
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        // first tick completes immediately
        ticker.tick().await;

        debug!("Fetching status for job {}", job_id);
        let outcome = source.fetch_status(&job_id).await;

        if apply(&state, &job_id, generation, outcome) == Step::Stop {
            break;
        }
    }
}

/// Records a fetch outcome and decides from it alone whether to continue
fn apply(
    state: &watch::Sender<PollState>,
    job_id: &str,
    generation: u64,
    outcome: Result<JobStatus>,
) -> Step {
    let mut step = Step::Stop;

    state.send_if_modified(|current| {
        if current.generation != generation {
            debug!("Discarding stale status for job {}", job_id);
            return false;
        }

        match outcome {
            Ok(status) if status.is_terminal() => {
                info!("Job {} finished: {}", job_id, status.status);
                current.status = Some(status);
                current.is_polling = false;
            }
            Ok(status) => {
                current.status = Some(status);
                step = Step::Continue;
            }
            Err(e) => {
                warn!("Failed to fetch status for job {}: {}", job_id, e);
                current.error = Some(e.to_string());
                current.is_polling = false;
            }
        }
        true
    });

    step
}
