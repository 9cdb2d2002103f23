//! Health domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of the most recent backend liveness check
///
/// Process-local and never persisted. Before the first check has run the
/// backend is assumed healthy and `last_checked` is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthSnapshot {
    pub healthy: bool,
    pub last_checked: Option<DateTime<Utc>>,
}

impl HealthSnapshot {
    pub fn healthy_at(at: DateTime<Utc>) -> Self {
        Self {
            healthy: true,
            last_checked: Some(at),
        }
    }

    pub fn unhealthy_at(at: DateTime<Utc>) -> Self {
        Self {
            healthy: false,
            last_checked: Some(at),
        }
    }
}

impl Default for HealthSnapshot {
    fn default() -> Self {
        Self {
            healthy: true,
            last_checked: None,
        }
    }
}
