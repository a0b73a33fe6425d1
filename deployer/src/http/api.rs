//! Platform operations the reconciler depends on

use async_trait::async_trait;
use openapi_client::models::{
    CreateDeploymentRequest, CreateDeploymentResponse, Deployment, EnvVar, UpsertEnvVarRequest,
};

use crate::errors::DeployerError;
use crate::http::client::HttpClient;

/// Platform API trait for testability
#[async_trait]
pub trait PlatformApi: Send + Sync {
    /// List up to `limit` deployments of a project, in platform order
    async fn list_deployments(
        &self,
        project_id: &str,
        limit: u32,
    ) -> Result<Vec<Deployment>, DeployerError>;

    /// List every environment variable of a project
    async fn list_env_vars(&self, project_id: &str) -> Result<Vec<EnvVar>, DeployerError>;

    async fn create_env_var(
        &self,
        project_id: &str,
        request: &UpsertEnvVarRequest,
    ) -> Result<(), DeployerError>;

    async fn update_env_var(
        &self,
        project_id: &str,
        env_var_id: &str,
        request: &UpsertEnvVarRequest,
    ) -> Result<(), DeployerError>;

    async fn create_deployment(
        &self,
        request: &CreateDeploymentRequest,
    ) -> Result<CreateDeploymentResponse, DeployerError>;
}

#[async_trait]
impl PlatformApi for HttpClient {
    async fn list_deployments(
        &self,
        project_id: &str,
        limit: u32,
    ) -> Result<Vec<Deployment>, DeployerError> {
        HttpClient::list_deployments(self, project_id, limit).await
    }

    async fn list_env_vars(&self, project_id: &str) -> Result<Vec<EnvVar>, DeployerError> {
        HttpClient::list_env_vars(self, project_id).await
    }

    async fn create_env_var(
        &self,
        project_id: &str,
        request: &UpsertEnvVarRequest,
    ) -> Result<(), DeployerError> {
        HttpClient::create_env_var(self, project_id, request).await?;
        Ok(())
    }

    async fn update_env_var(
        &self,
        project_id: &str,
        env_var_id: &str,
        request: &UpsertEnvVarRequest,
    ) -> Result<(), DeployerError> {
        HttpClient::update_env_var(self, project_id, env_var_id, request).await?;
        Ok(())
    }

    async fn create_deployment(
        &self,
        request: &CreateDeploymentRequest,
    ) -> Result<CreateDeploymentResponse, DeployerError> {
        HttpClient::create_deployment(self, request).await
    }
}
