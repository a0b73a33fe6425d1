//! Preview deployment reconciler
//!
//! Brings the platform into agreement with the branch: looks up an active deployment
//! and the API URL variable, upserts the variable, then redeploys or creates. Each step
//! has its own failure policy:
//!
//! - lookups abort the run,
//! - a failed upsert is logged and the run continues,
//! - a failed redeploy falls back once to creating a deployment, whose failure aborts.

use openapi_client::models::{
    CreateDeploymentRequest, CreateDeploymentResponse, UpsertEnvVarRequest,
};
use tracing::{error, info, warn};

use crate::app::config::Config;
use crate::deploy::fsm::{ReconcileEvent, ReconcileFsm, ReconcileState};
use crate::deploy::select::{
    order_most_recent_first, select_deployment, select_env_var, API_URL_ENV_KEY,
};
use crate::errors::{DeployerError, Stage};
use crate::http::api::PlatformApi;
use crate::http::deployments::DEPLOYMENT_LIST_LIMIT;

/// What happened to the API URL environment variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvVarOutcome {
    Created,
    Updated { id: String },
    Failed(String),
}

/// How the preview deployment was triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployMode {
    Redeployed,
    Created,
    CreatedAfterFallback,
}

/// Deployment triggered by the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployOutcome {
    pub mode: DeployMode,
    pub id: Option<String>,

    /// Absent when the platform did not report one
    pub url: Option<String>,
}

/// Result of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub target_api_url: String,
    pub env_var: EnvVarOutcome,
    pub deployment: DeployOutcome,
}

/// Reconciles one branch against the platform
pub struct Reconciler<'a, A: PlatformApi + ?Sized> {
    api: &'a A,
    config: &'a Config,
    fsm: ReconcileFsm,
}

impl<'a, A: PlatformApi + ?Sized> Reconciler<'a, A> {
    pub fn new(api: &'a A, config: &'a Config) -> Self {
        Self {
            api,
            config,
            fsm: ReconcileFsm::new(),
        }
    }

    /// Current position in the run
    pub fn state(&self) -> ReconcileState {
        self.fsm.state()
    }

    /// Run every step in order
    pub async fn reconcile(&mut self) -> Result<RunReport, DeployerError> {
        let target_api_url = self.config.target_api_url();
        info!(
            "Reconciling preview for branch '{}' (project {})",
            self.config.branch, self.config.project_id
        );

        self.advance(ReconcileEvent::Begin)?;
        let existing = self.find_active_deployment().await?;
        self.advance(ReconcileEvent::DeploymentLookedUp)?;

        let env_var_id = self.find_env_var().await?;
        self.advance(ReconcileEvent::EnvVarLookedUp)?;

        let env_var = self.upsert_env_var(env_var_id, &target_api_url).await;
        self.advance(ReconcileEvent::EnvVarSettled)?;

        let deployment = match existing {
            Some(deployment_id) => self.redeploy_or_create(&deployment_id).await?,
            None => {
                self.advance(ReconcileEvent::Create)?;
                let response = self.create().await?;
                outcome(DeployMode::Created, response)
            }
        };
        self.advance(ReconcileEvent::Deployed)?;

        Ok(RunReport {
            target_api_url,
            env_var,
            deployment,
        })
    }

    /// Step 1. A listing failure is fatal, never "no deployment".
    async fn find_active_deployment(&mut self) -> Result<Option<String>, DeployerError> {
        let (api, config) = (self.api, self.config);
        info!("Looking for an active deployment of '{}'...", config.branch);

        let listed = api
            .list_deployments(&config.project_id, DEPLOYMENT_LIST_LIMIT)
            .await;
        let mut deployments = match listed {
            Ok(deployments) => deployments,
            Err(e) => return Err(self.halt(Stage::LookupDeployment, e)),
        };

        order_most_recent_first(&mut deployments);
        match select_deployment(&deployments, &config.branch) {
            Some(deployment) => {
                info!(
                    "Found {:?} deployment {} ({})",
                    deployment.state, deployment.uid, deployment.name
                );
                Ok(Some(deployment.uid.clone()))
            }
            None => {
                info!(
                    "No active deployment among {} for '{}'",
                    deployments.len(),
                    config.branch
                );
                Ok(None)
            }
        }
    }

    /// Step 2. A listing failure is fatal.
    async fn find_env_var(&mut self) -> Result<Option<String>, DeployerError> {
        let (api, config) = (self.api, self.config);
        let listed = api.list_env_vars(&config.project_id).await;
        let envs = match listed {
            Ok(envs) => envs,
            Err(e) => return Err(self.halt(Stage::LookupEnvVar, e)),
        };

        let id = select_env_var(&envs).map(|env| env.id.clone());
        match &id {
            Some(id) => info!("Found {} ({})", API_URL_ENV_KEY, id),
            None => info!("{} is not set on the project", API_URL_ENV_KEY),
        }
        Ok(id)
    }

    /// Step 3. Failures are reported but never stop the run.
    async fn upsert_env_var(&self, existing_id: Option<String>, value: &str) -> EnvVarOutcome {
        let project_id = &self.config.project_id;
        let request = UpsertEnvVarRequest::preview(API_URL_ENV_KEY, value);

        let result = match &existing_id {
            Some(id) => self.api.update_env_var(project_id, id, &request).await,
            None => self.api.create_env_var(project_id, &request).await,
        };

        match (result, existing_id) {
            (Ok(()), Some(id)) => {
                info!("Updated {} = {}", API_URL_ENV_KEY, value);
                EnvVarOutcome::Updated { id }
            }
            (Ok(()), None) => {
                info!("Created {} = {}", API_URL_ENV_KEY, value);
                EnvVarOutcome::Created
            }
            (Err(e), _) => {
                error!("{}: {}", Stage::UpsertEnvVar, e);
                EnvVarOutcome::Failed(e.to_string())
            }
        }
    }

    /// Step 4 with an existing deployment. One fallback, no retries.
    async fn redeploy_or_create(
        &mut self,
        deployment_id: &str,
    ) -> Result<DeployOutcome, DeployerError> {
        self.advance(ReconcileEvent::Redeploy)?;
        info!("Redeploying {}...", deployment_id);

        let api = self.api;
        let redeployed = api
            .create_deployment(&CreateDeploymentRequest::redeploy(deployment_id))
            .await;
        match redeployed {
            Ok(response) => Ok(outcome(DeployMode::Redeployed, response)),
            Err(e) => {
                warn!(
                    "{} of {} failed, creating a new deployment instead: {}",
                    Stage::Redeploy,
                    deployment_id,
                    e
                );
                self.advance(ReconcileEvent::Create)?;
                let response = self.create().await?;
                Ok(outcome(DeployMode::CreatedAfterFallback, response))
            }
        }
    }

    /// Step 4b. Fatal on failure.
    async fn create(&mut self) -> Result<CreateDeploymentResponse, DeployerError> {
        let (api, config) = (self.api, self.config);
        let request = CreateDeploymentRequest::from_github_branch(
            config.preview_name(),
            &config.project_id,
            &config.branch,
        );
        info!("Creating deployment {} from '{}'...", config.preview_name(), config.branch);

        let created = api.create_deployment(&request).await;
        match created {
            Ok(response) => Ok(response),
            Err(e) => Err(self.halt(Stage::Create, e)),
        }
    }

    fn advance(&mut self, event: ReconcileEvent) -> Result<ReconcileState, DeployerError> {
        self.fsm.process(event).map_err(DeployerError::Reconcile)
    }

    fn halt(&mut self, stage: Stage, source: DeployerError) -> DeployerError {
        error!("{} failed: {}", stage, source);
        if let Err(e) = self.fsm.process(ReconcileEvent::Fail(stage, source.to_string())) {
            error!("{}", e);
        }
        DeployerError::at(stage, source)
    }
}

fn outcome(mode: DeployMode, response: CreateDeploymentResponse) -> DeployOutcome {
    match &response.url {
        Some(url) => info!("Deployment triggered: https://{}", url.trim_start_matches("https://")),
        None => info!("Deployment triggered, the platform returned no URL"),
    }
    DeployOutcome {
        mode,
        id: response.deployment_id().map(str::to_string),
        url: response.url,
    }
}

/// Reconcile the configured branch with a platform client
pub async fn reconcile<A: PlatformApi + ?Sized>(
    api: &A,
    config: &Config,
) -> Result<RunReport, DeployerError> {
    Reconciler::new(api, config).reconcile().await
}
