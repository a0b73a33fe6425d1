//! Reconcile configuration, read once at startup

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::deploy::select::{derive_target_url, preview_name};
use crate::errors::ConfigError;
use crate::logs::LogOptions;

/// Recognized configuration keys
pub mod keys {
    pub const TOKEN: &str = "TOKEN";
    pub const PROJECT_ID: &str = "PROJECT_ID";
    pub const ORG_ID: &str = "ORG_ID";
    pub const BRANCH: &str = "BRANCH";
    pub const PLATFORM_API_URL: &str = "PLATFORM_API_URL";
    pub const PREVIEW_BASE_DOMAIN: &str = "PREVIEW_BASE_DOMAIN";
    pub const REQUEST_TIMEOUT_SECS: &str = "REQUEST_TIMEOUT_SECS";
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
    pub const LOG_FORMAT: &str = "LOG_FORMAT";
}

pub const DEFAULT_PLATFORM_API_URL: &str = "https://api.vercel.com";
pub const DEFAULT_PREVIEW_BASE_DOMAIN: &str = "example.com";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Immutable configuration for one reconcile run
#[derive(Debug)]
pub struct Config {
    /// Bearer credential for the platform API
    pub token: SecretString,

    pub project_id: String,

    /// Required but not sent to the platform
    pub org_id: String,

    pub branch: String,

    pub api_base_url: Url,

    /// Domain the preview API hostname lives under
    pub base_domain: String,

    /// Per-request transport timeout
    pub request_timeout: Duration,

    pub log: LogOptions,
}

impl Config {
    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from a key lookup. Blank values count as absent
    /// and every missing required key is reported in one error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let token = get(keys::TOKEN);
        let project_id = get(keys::PROJECT_ID);
        let org_id = get(keys::ORG_ID);
        let branch = get(keys::BRANCH);

        let (token, project_id, org_id, branch) = match (token, project_id, org_id, branch) {
            (Some(token), Some(project_id), Some(org_id), Some(branch)) => {
                (token, project_id, org_id, branch)
            }
            (token, project_id, org_id, branch) => {
                let missing = [
                    (keys::TOKEN, token.is_none()),
                    (keys::PROJECT_ID, project_id.is_none()),
                    (keys::ORG_ID, org_id.is_none()),
                    (keys::BRANCH, branch.is_none()),
                ]
                .into_iter()
                .filter_map(|(key, absent)| absent.then_some(key))
                .collect();
                return Err(ConfigError::Missing(missing));
            }
        };

        let api_base_url = parse_api_url(
            get(keys::PLATFORM_API_URL)
                .as_deref()
                .unwrap_or(DEFAULT_PLATFORM_API_URL),
        )?;

        let base_domain = match get(keys::PREVIEW_BASE_DOMAIN) {
            Some(raw) => parse_base_domain(&raw)?,
            None => DEFAULT_PREVIEW_BASE_DOMAIN.to_string(),
        };

        let request_timeout = match get(keys::REQUEST_TIMEOUT_SECS) {
            Some(raw) => parse_timeout(&raw)?,
            None => DEFAULT_REQUEST_TIMEOUT,
        };

        let log = LogOptions::from_lookup(&lookup)?;

        Ok(Self {
            token: SecretString::new(token.into()),
            project_id,
            org_id,
            branch,
            api_base_url,
            base_domain,
            request_timeout,
            log,
        })
    }

    /// API URL the preview frontend should call
    pub fn target_api_url(&self) -> String {
        derive_target_url(&self.branch, &self.base_domain)
    }

    /// Display name for a fresh preview deployment
    pub fn preview_name(&self) -> String {
        preview_name(&self.branch)
    }
}

fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::Invalid {
        key: keys::PLATFORM_API_URL,
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ConfigError::Invalid {
            key: keys::PLATFORM_API_URL,
            reason: format!("unsupported scheme '{}'", scheme),
        }),
    }
}

fn parse_base_domain(raw: &str) -> Result<String, ConfigError> {
    let domain = raw.trim_matches('.');
    if domain.is_empty() {
        return Err(ConfigError::Invalid {
            key: keys::PREVIEW_BASE_DOMAIN,
            reason: format!("'{}' names no domain", raw),
        });
    }
    Ok(domain.to_string())
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::Invalid {
            key: keys::REQUEST_TIMEOUT_SECS,
            reason: format!("expected a positive number of seconds, got '{}'", raw),
        }),
    }
}
