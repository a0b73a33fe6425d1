//! Error types for the preview deployer

use std::fmt;

use thiserror::Error;

/// Configuration problems detected before any network call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required configuration: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Reconcile step a failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    LookupDeployment,
    LookupEnvVar,
    UpsertEnvVar,
    Redeploy,
    Create,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::LookupDeployment => "deployment lookup",
            Stage::LookupEnvVar => "environment variable lookup",
            Stage::UpsertEnvVar => "environment variable upsert",
            Stage::Redeploy => "redeploy",
            Stage::Create => "deployment creation",
        };
        f.write_str(name)
    }
}

/// Main error type for the preview deployer
#[derive(Error, Debug)]
pub enum DeployerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Platform API error: {status} - {body}")]
    Api { status: u16, body: String },

    #[error("Server error: {0}")]
    Server(String),

    #[error("Reconcile error: {0}")]
    Reconcile(String),

    #[error("{stage} failed: {source}")]
    Step {
        stage: Stage,
        #[source]
        source: Box<DeployerError>,
    },
}

impl DeployerError {
    /// Tag an error with the reconcile step it came from
    pub fn at(stage: Stage, source: DeployerError) -> Self {
        DeployerError::Step {
            stage,
            source: Box::new(source),
        }
    }

    /// Step that failed, for errors raised by the reconciler
    pub fn stage(&self) -> Option<Stage> {
        match self {
            DeployerError::Step { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Process exit status for a fatal error
    pub fn exit_code(&self) -> i32 {
        match self {
            DeployerError::Config(_) => 2,
            _ => 1,
        }
    }
}
