//! Health DTOs

use serde::{Deserialize, Serialize};

/// Body of `GET /health`
///
/// The backend reports `{"status": "healthy"}`; only the HTTP status code
/// decides liveness, the string is informational.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
