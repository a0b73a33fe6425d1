//! Server state

use std::time::Instant;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::utils::{version_info, VersionInfo};

/// Server state shared across handlers
pub struct ServerState {
    pub service: String,
    pub version: VersionInfo,
    pub started_at: DateTime<Utc>,
    started: Instant,
}

impl ServerState {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            version: version_info(),
            started_at: Utc::now(),
            started: Instant::now(),
        }
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started.elapsed().as_secs()
    }

    pub fn started_at_rfc3339(&self) -> String {
        self.started_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new("preview-deployer")
    }
}
