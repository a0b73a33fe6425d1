//! Platform API models

use serde::{Deserialize, Serialize};

/// Deployment lifecycle state as reported by the platform
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeploymentState {
    Ready,
    Building,
    Queued,
    Initializing,
    Error,
    Canceled,
    #[default]
    #[serde(other)]
    Unknown,
}

impl DeploymentState {
    /// A deployment that is serving or about to serve traffic
    pub fn is_active(&self) -> bool {
        matches!(self, DeploymentState::Ready | DeploymentState::Building)
    }
}

/// Source metadata recorded on a deployment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeploymentMeta {
    /// Branch the deployment was built from
    #[serde(rename = "githubCommitRef", default, skip_serializing_if = "Option::is_none")]
    pub github_commit_ref: Option<String>,
}

/// A deployment record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deployment {
    pub uid: String,
    pub name: String,

    #[serde(default)]
    pub state: DeploymentState,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Creation time in milliseconds since the epoch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<DeploymentMeta>,
}

impl Deployment {
    /// Branch recorded by the platform, if any
    pub fn branch_ref(&self) -> Option<&str> {
        self.meta
            .as_ref()
            .and_then(|meta| meta.github_commit_ref.as_deref())
    }
}

/// `GET /v6/deployments` response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeploymentListResponse {
    #[serde(default)]
    pub deployments: Vec<Deployment>,
}

/// Environment variable type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvVarType {
    #[default]
    Plain,
    Encrypted,
    Secret,
    Sensitive,
    System,
    #[serde(other)]
    Unknown,
}

/// Deployment environment an environment variable applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvTarget {
    Production,
    Preview,
    Development,
    #[serde(other)]
    Unknown,
}

/// A project environment variable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvVar {
    pub id: String,
    pub key: String,

    /// Omitted by the platform for encrypted values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(rename = "type", default)]
    pub env_type: EnvVarType,

    #[serde(default)]
    pub target: Vec<EnvTarget>,
}

/// `GET /v9/projects/{id}/env` response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvVarListResponse {
    #[serde(default)]
    pub envs: Vec<EnvVar>,
}

/// Body for both creating and editing an environment variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertEnvVarRequest {
    pub key: String,
    pub value: String,

    #[serde(rename = "type")]
    pub env_type: EnvVarType,

    pub target: Vec<EnvTarget>,
}

impl UpsertEnvVarRequest {
    /// Plain-text variable scoped to preview deployments
    pub fn preview(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            env_type: EnvVarType::Plain,
            target: vec![EnvTarget::Preview],
        }
    }
}

/// Git source of a deployment built from a branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitSource {
    #[serde(rename = "type")]
    pub source_type: String,

    #[serde(rename = "ref")]
    pub git_ref: String,
}

/// `POST /v13/deployments` request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeploymentRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Redeploy an existing deployment by reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,

    pub target: EnvTarget,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_source: Option<GitSource>,
}

impl CreateDeploymentRequest {
    /// Re-trigger an existing deployment under the preview target
    pub fn redeploy(deployment_id: impl Into<String>) -> Self {
        Self {
            name: None,
            deployment_id: Some(deployment_id.into()),
            project: None,
            target: EnvTarget::Preview,
            git_source: None,
        }
    }

    /// Fresh preview deployment built from the head of a GitHub branch
    pub fn from_github_branch(
        name: impl Into<String>,
        project: impl Into<String>,
        branch: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            deployment_id: None,
            project: Some(project.into()),
            target: EnvTarget::Preview,
            git_source: Some(GitSource {
                source_type: "github".to_string(),
                git_ref: branch.into(),
            }),
        }
    }
}

/// `POST /v13/deployments` response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateDeploymentResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Older API versions name the identifier `uid`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl CreateDeploymentResponse {
    pub fn deployment_id(&self) -> Option<&str> {
        self.id.as_deref().or(self.uid.as_deref())
    }
}
