//! Scheduler layer
//!
//! Timer-driven components that follow backend state: the job poller and
//! the health prober. Each owns its background task through a guard that
//! aborts the task when dropped, so no timer outlives the component or
//! the job it was started for.

pub mod poller;
pub mod prober;
mod task;

pub use poller::{JobPoller, PollPhase, PollState};
pub use prober::{HealthProbe, HealthProber};

use std::time::Duration;

use tracing::warn;

/// Shortest tick accepted by the scheduler; `tokio::time::interval` rejects zero
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

fn clamp_interval(interval: Duration) -> Duration {
    if interval < MIN_INTERVAL {
        warn!("Interval {:?} too short, using {:?}", interval, MIN_INTERVAL);
        MIN_INTERVAL
    } else {
        interval
    }
}
