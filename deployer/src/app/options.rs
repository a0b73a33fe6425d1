//! Health-check server options

use crate::errors::ConfigError;

/// Local HTTP server options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerOptions {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerOptions {
    /// Read `HOST` and `PORT` from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = Self::default();

        if let Some(host) = lookup("HOST").filter(|h| !h.trim().is_empty()) {
            options.host = host.trim().to_string();
        }

        if let Some(port) = lookup("PORT").filter(|p| !p.trim().is_empty()) {
            options.port = port.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "PORT",
                reason: format!("'{}' is not a valid port", port),
            })?;
        }

        Ok(options)
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
