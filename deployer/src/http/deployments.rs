//! Deployment API client

use openapi_client::models::{
    CreateDeploymentRequest, CreateDeploymentResponse, Deployment, DeploymentListResponse,
};

use crate::errors::DeployerError;
use crate::http::client::HttpClient;

/// Page size used when listing a project's deployments
pub const DEPLOYMENT_LIST_LIMIT: u32 = 50;

impl HttpClient {
    /// List the most recent deployments of a project
    pub async fn list_deployments(
        &self,
        project_id: &str,
        limit: u32,
    ) -> Result<Vec<Deployment>, DeployerError> {
        let query = [("projectId", project_id.to_string()), ("limit", limit.to_string())];
        let response: DeploymentListResponse = self.get("/v6/deployments", &query).await?;
        Ok(response.deployments)
    }

    /// Create a deployment, either from a git source or by reference
    pub async fn create_deployment(
        &self,
        request: &CreateDeploymentRequest,
    ) -> Result<CreateDeploymentResponse, DeployerError> {
        self.post("/v13/deployments", request).await
    }
}
