//! Health-check server models

use serde::{Deserialize, Serialize};

/// Root response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
}

/// Health response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,

    /// RFC 3339 start time
    pub started_at: String,

    pub uptime_secs: u64,
}
