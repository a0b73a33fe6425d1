//! Project environment variable API client

use openapi_client::models::{EnvVar, EnvVarListResponse, UpsertEnvVarRequest};

use crate::errors::DeployerError;
use crate::http::client::HttpClient;

impl HttpClient {
    /// List all environment variables of a project
    pub async fn list_env_vars(&self, project_id: &str) -> Result<Vec<EnvVar>, DeployerError> {
        let path = format!("/v9/projects/{}/env", project_id);
        let response: EnvVarListResponse = self.get(&path, &()).await?;
        Ok(response.envs)
    }

    /// Create a project environment variable
    pub async fn create_env_var(
        &self,
        project_id: &str,
        request: &UpsertEnvVarRequest,
    ) -> Result<serde_json::Value, DeployerError> {
        let path = format!("/v10/projects/{}/env", project_id);
        self.post(&path, request).await
    }

    /// Edit an existing project environment variable
    pub async fn update_env_var(
        &self,
        project_id: &str,
        env_var_id: &str,
        request: &UpsertEnvVarRequest,
    ) -> Result<serde_json::Value, DeployerError> {
        let path = format!("/v9/projects/{}/env/{}", project_id, env_var_id);
        self.patch(&path, request).await
    }
}
