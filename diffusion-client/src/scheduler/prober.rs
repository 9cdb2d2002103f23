//! Health prober
//!
//! Checks backend liveness once on activation and then on a fixed interval
//! until deactivated. A failed check never escapes the prober; it only
//! flips the snapshot to unhealthy. There is no retry or backoff: the next
//! tick is the retry.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use diffusion_core::domain::health::HealthSnapshot;
use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::clamp_interval;
use super::task::TaskGuard;
use crate::source::HealthSource;

/// Default delay between two health checks
pub const DEFAULT_HEALTH_INTERVAL: Duration = Duration::from_millis(10_000);

/// Factory for health probes
pub struct HealthProber {
    source: Arc<dyn HealthSource>,
    interval: Duration,
}

impl HealthProber {
    /// Intervals shorter than [`super::MIN_INTERVAL`] are raised to it.
    pub fn new(source: Arc<dyn HealthSource>, interval: Duration) -> Self {
        Self {
            source,
            interval: clamp_interval(interval),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Activates probing; it runs until the returned probe is dropped
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self) -> HealthProbe {
        let (tx, rx) = watch::channel(HealthSnapshot::default());
        info!("Starting health prober (interval: {:?})", self.interval);

        let task = TaskGuard::spawn(probe_loop(Arc::clone(&self.source), tx, self.interval));

        HealthProbe { state: rx, _task: task }
    }
}

/// An active health probe
pub struct HealthProbe {
    state: watch::Receiver<HealthSnapshot>,
    _task: TaskGuard,
}

impl HealthProbe {
    /// Latest snapshot
    pub fn snapshot(&self) -> HealthSnapshot {
        *self.state.borrow()
    }

    /// Receiver notified after every check
    pub fn subscribe(&self) -> watch::Receiver<HealthSnapshot> {
        self.state.clone()
    }

    /// Deactivates the probe
    pub fn stop(self) {
        drop(self);
    }
}

async fn probe_loop(
    source: Arc<dyn HealthSource>,
    state: watch::Sender<HealthSnapshot>,
    period: Duration,
) {
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        let healthy = match source.check_health().await {
            Ok(response) => {
                debug!("Backend healthy (status: {})", response.status);
                true
            }
            Err(e) => {
                warn!("Health check failed: {}", e);
                false
            }
        };

        let now = Utc::now();
        let snapshot = if healthy {
            HealthSnapshot::healthy_at(now)
        } else {
            HealthSnapshot::unhealthy_at(now)
        };
        state.send_replace(snapshot);
    }
}
