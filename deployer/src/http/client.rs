//! HTTP client implementation

use std::time::Duration;

use reqwest::{header, Client, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error};
use url::Url;

use crate::app::config::Config;
use crate::errors::DeployerError;

/// HTTP client for the hosting platform API
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: SecretString,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(
        base_url: &Url,
        token: &SecretString,
        timeout: Duration,
    ) -> Result<Self, DeployerError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("preview-deployer/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            token: SecretString::new(token.expose_secret().into()),
        })
    }

    /// Create a client from the run configuration
    pub fn from_config(config: &Config) -> Result<Self, DeployerError> {
        Self::new(&config.api_base_url, &config.token, config.request_timeout)
    }

    /// Make a GET request
    pub async fn get<T, Q>(&self, path: &str, query: &Q) -> Result<T, DeployerError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let url = self.url(path);
        debug!("GET {}", url);
        self.execute("GET", self.client.get(&url).query(query)).await
    }

    /// Make a POST request
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, DeployerError> {
        let url = self.url(path);
        debug!("POST {}", url);
        self.execute("POST", self.client.post(&url).json(body)).await
    }

    /// Make a PATCH request
    pub async fn patch<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, DeployerError> {
        let url = self.url(path);
        debug!("PATCH {}", url);
        self.execute("PATCH", self.client.patch(&url).json(body)).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: &str,
        request: RequestBuilder,
    ) -> Result<T, DeployerError> {
        let response = request
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.token.expose_secret()),
            )
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("HTTP {} failed: {} - {}", method, status, body);
            return Err(DeployerError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.json().await?;
        Ok(body)
    }
}
