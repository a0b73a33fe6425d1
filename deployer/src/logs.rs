//! Logging configuration

use std::str::FromStr;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::app::config::keys;
use crate::errors::{ConfigError, DeployerError};

/// Log level configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::Invalid {
                key: keys::LOG_LEVEL,
                reason: format!("unknown log level '{}'", s),
            }),
        }
    }
}

/// Logging options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogOptions {
    pub log_level: LogLevel,

    /// Emit one JSON object per event
    pub json_format: bool,
}

impl LogOptions {
    /// Read `LOG_LEVEL` and `LOG_FORMAT` from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read `LOG_LEVEL` and `LOG_FORMAT` through a key lookup. Blank values count as absent.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let log_level = match get(keys::LOG_LEVEL) {
            Some(raw) => raw.parse::<LogLevel>()?,
            None => LogLevel::default(),
        };

        let json_format = match get(keys::LOG_FORMAT).as_deref() {
            None | Some("text") => false,
            Some("json") => true,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: keys::LOG_FORMAT,
                    reason: format!("expected 'text' or 'json', got '{}'", other),
                })
            }
        };

        Ok(Self {
            log_level,
            json_format,
        })
    }
}

/// Initialize logging. `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(options: &LogOptions) -> Result<(), DeployerError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(options.log_level.as_filter_str()));

    let subscriber = tracing_subscriber::registry().with(filter);

    if options.json_format {
        subscriber
            .with(fmt::layer().json())
            .try_init()
            .map_err(|e| DeployerError::Server(format!("logging: {}", e)))
    } else {
        subscriber
            .with(fmt::layer().with_target(false))
            .try_init()
            .map_err(|e| DeployerError::Server(format!("logging: {}", e)))
    }
}
