//! Reconciler scenarios against an in-memory platform

use openapi_client::models::{
    CreateDeploymentRequest, DeploymentState, EnvTarget, EnvVar, EnvVarType, UpsertEnvVarRequest,
};
use preview_deployer::deploy::fsm::ReconcileState;
use preview_deployer::deploy::reconciler::{reconcile, DeployMode, EnvVarOutcome, Reconciler};
use preview_deployer::errors::{ConfigError, Stage};
use tokio_test::{assert_err, assert_ok};

use crate::common::{config_with, deployment, test_config, Call, Fail, FakePlatform};

const TARGET_URL: &str = "https://api.pr-feat-login.deploy-preview.acme.dev";

fn api_url_var(id: &str, value: &str) -> EnvVar {
    EnvVar {
        id: id.to_string(),
        key: "VITE_API_URL".to_string(),
        value: Some(value.to_string()),
        env_type: EnvVarType::Plain,
        target: vec![EnvTarget::Preview],
    }
}

#[tokio::test]
async fn test_empty_list_creates_new_deployment() {
    let platform = FakePlatform::new();
    let config = test_config("feat-login");

    let report = assert_ok!(reconcile(&platform, &config).await);

    assert_eq!(report.target_api_url, TARGET_URL);
    assert_eq!(report.env_var, EnvVarOutcome::Created);
    assert_eq!(report.deployment.mode, DeployMode::Created);
    assert_eq!(report.deployment.id.as_deref(), Some("dpl_pr-feat-login"));
    assert_eq!(
        platform.deployment_requests(),
        vec![CreateDeploymentRequest::from_github_branch(
            "pr-feat-login",
            "prj_web",
            "feat-login"
        )]
    );
}

#[tokio::test]
async fn test_ready_deployment_on_branch_is_redeployed() {
    let platform = FakePlatform::new().with_deployments(vec![deployment(
        "dpl_1",
        "web",
        DeploymentState::Ready,
        Some("feat-login"),
    )]);
    let config = test_config("feat-login");

    let report = assert_ok!(reconcile(&platform, &config).await);

    assert_eq!(report.deployment.mode, DeployMode::Redeployed);
    assert_eq!(report.deployment.id.as_deref(), Some("dpl_1-redeploy"));
    assert_eq!(
        platform.deployment_requests(),
        vec![CreateDeploymentRequest::redeploy("dpl_1")]
    );
}

#[tokio::test]
async fn test_errored_deployment_is_ignored() {
    let platform = FakePlatform::new().with_deployments(vec![deployment(
        "dpl_1",
        "pr-feat-login",
        DeploymentState::Error,
        Some("feat-login"),
    )]);
    let config = test_config("feat-login");

    let report = assert_ok!(reconcile(&platform, &config).await);

    assert_eq!(report.deployment.mode, DeployMode::Created);
    let requests = platform.deployment_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].name.as_deref(), Some("pr-feat-login"));
    assert!(requests[0].deployment_id.is_none());
}

#[tokio::test]
async fn test_failed_redeploy_falls_back_to_create() {
    let platform = FakePlatform::new()
        .with_deployments(vec![deployment(
            "dpl_1",
            "web-feat-login",
            DeploymentState::Building,
            None,
        )])
        .failing(Fail::Redeploy);
    let config = test_config("feat-login");

    let report = assert_ok!(reconcile(&platform, &config).await);

    assert_eq!(report.deployment.mode, DeployMode::CreatedAfterFallback);
    assert_eq!(
        platform.deployment_requests(),
        vec![
            CreateDeploymentRequest::redeploy("dpl_1"),
            CreateDeploymentRequest::from_github_branch("pr-feat-login", "prj_web", "feat-login"),
        ]
    );
}

#[tokio::test]
async fn test_fallback_failure_is_fatal() {
    let platform = FakePlatform::new()
        .with_deployments(vec![deployment(
            "dpl_1",
            "web",
            DeploymentState::Ready,
            Some("feat-login"),
        )])
        .failing(Fail::Redeploy)
        .failing(Fail::CreateFromGit);
    let config = test_config("feat-login");

    let mut reconciler = Reconciler::new(&platform, &config);
    let err = assert_err!(reconciler.reconcile().await);

    assert_eq!(err.stage(), Some(Stage::Create));
    assert_eq!(err.exit_code(), 1);
    assert_eq!(reconciler.state(), ReconcileState::Halted);
    // One redeploy and one create, no retries
    assert_eq!(platform.deployment_requests().len(), 2);
}

#[tokio::test]
async fn test_create_failure_without_fallback_is_fatal() {
    let platform = FakePlatform::new().failing(Fail::CreateFromGit);
    let config = test_config("feat-login");

    let err = assert_err!(reconcile(&platform, &config).await);
    assert_eq!(err.stage(), Some(Stage::Create));
    assert_eq!(platform.deployment_requests().len(), 1);
}

#[tokio::test]
async fn test_missing_branch_aborts_before_any_call() {
    let platform = FakePlatform::new();

    let result = config_with(&[
        ("TOKEN", "tok_test"),
        ("PROJECT_ID", "prj_web"),
        ("ORG_ID", "team_acme"),
    ]);

    let err = assert_err!(result);
    assert_eq!(err, ConfigError::Missing(vec!["BRANCH"]));
    assert_eq!(
        preview_deployer::errors::DeployerError::from(err).exit_code(),
        2
    );
    assert!(platform.calls().is_empty());
}

#[tokio::test]
async fn test_deployment_listing_failure_aborts() {
    let platform = FakePlatform::new().failing(Fail::ListDeployments);
    let config = test_config("feat-login");

    let mut reconciler = Reconciler::new(&platform, &config);
    let err = assert_err!(reconciler.reconcile().await);

    assert_eq!(err.stage(), Some(Stage::LookupDeployment));
    assert_eq!(reconciler.state(), ReconcileState::Halted);
    assert_eq!(
        platform.calls(),
        vec![Call::ListDeployments {
            project_id: "prj_web".to_string(),
            limit: 50,
        }]
    );
}

#[tokio::test]
async fn test_env_listing_failure_aborts() {
    let platform = FakePlatform::new().failing(Fail::ListEnvVars);
    let config = test_config("feat-login");

    let err = assert_err!(reconcile(&platform, &config).await);

    assert_eq!(err.stage(), Some(Stage::LookupEnvVar));
    assert_eq!(platform.calls().len(), 2);
    assert!(platform.deployment_requests().is_empty());
}

#[tokio::test]
async fn test_upsert_failure_does_not_stop_deploy() {
    let platform = FakePlatform::new().failing(Fail::UpsertEnvVar);
    let config = test_config("feat-login");

    let report = assert_ok!(reconcile(&platform, &config).await);

    assert!(matches!(report.env_var, EnvVarOutcome::Failed(_)));
    assert_eq!(report.deployment.mode, DeployMode::Created);
    assert!(platform.env_vars().is_empty());
}

#[tokio::test]
async fn test_existing_variable_is_updated_in_place() {
    let platform = FakePlatform::new().with_env_vars(vec![
        EnvVar {
            id: "env_db".to_string(),
            key: "DATABASE_URL".to_string(),
            value: None,
            env_type: EnvVarType::Encrypted,
            target: vec![EnvTarget::Production],
        },
        api_url_var("env_api", "https://api.old.example.com"),
    ]);
    let config = test_config("feat-login");

    let report = assert_ok!(reconcile(&platform, &config).await);

    assert_eq!(
        report.env_var,
        EnvVarOutcome::Updated {
            id: "env_api".to_string()
        }
    );
    assert!(platform.calls().contains(&Call::UpdateEnvVar {
        project_id: "prj_web".to_string(),
        id: "env_api".to_string(),
        request: UpsertEnvVarRequest::preview("VITE_API_URL", TARGET_URL),
    }));
    let envs = platform.env_vars();
    assert_eq!(envs.len(), 2);
    assert_eq!(envs[1].value.as_deref(), Some(TARGET_URL));
}

#[tokio::test]
async fn test_repeated_runs_converge_on_one_variable() {
    let platform = FakePlatform::new();

    assert_ok!(reconcile(&platform, &test_config("feat-login")).await);
    let second = assert_ok!(reconcile(&platform, &test_config("feat-signup")).await);

    assert_eq!(
        second.env_var,
        EnvVarOutcome::Updated {
            id: "env_1".to_string()
        }
    );
    let envs = platform.env_vars();
    assert_eq!(envs.len(), 1);
    assert_eq!(
        envs[0].value.as_deref(),
        Some("https://api.pr-feat-signup.deploy-preview.acme.dev")
    );
    assert_eq!(envs[0].target, vec![EnvTarget::Preview]);
    assert_eq!(envs[0].env_type, EnvVarType::Plain);
}

#[tokio::test]
async fn test_missing_url_is_soft_success() {
    let platform = FakePlatform::new().without_urls();
    let config = test_config("feat-login");

    let report = assert_ok!(reconcile(&platform, &config).await);
    assert!(report.deployment.url.is_none());
    assert!(report.deployment.id.is_some());
}

#[tokio::test]
async fn test_steps_run_in_order() {
    let platform = FakePlatform::new();
    let config = test_config("feat-login");

    let mut reconciler = Reconciler::new(&platform, &config);
    assert_eq!(reconciler.state(), ReconcileState::Start);
    assert_ok!(reconciler.reconcile().await);
    assert_eq!(reconciler.state(), ReconcileState::Done);

    let kinds: Vec<&str> = platform
        .calls()
        .iter()
        .map(|call| match call {
            Call::ListDeployments { .. } => "list_deployments",
            Call::ListEnvVars { .. } => "list_env_vars",
            Call::CreateEnvVar { .. } => "create_env_var",
            Call::UpdateEnvVar { .. } => "update_env_var",
            Call::CreateDeployment(_) => "create_deployment",
        })
        .collect();
    assert_eq!(
        kinds,
        vec!["list_deployments", "list_env_vars", "create_env_var", "create_deployment"]
    );
}

#[tokio::test]
async fn test_newest_matching_deployment_wins() {
    let mut older = deployment("dpl_old", "web", DeploymentState::Ready, Some("feat-login"));
    older.created = Some(1_700_000_000_000);
    let mut newer = deployment("dpl_new", "web", DeploymentState::Ready, Some("feat-login"));
    newer.created = Some(1_700_000_500_000);

    let platform = FakePlatform::new().with_deployments(vec![older, newer]);
    let config = test_config("feat-login");

    assert_ok!(reconcile(&platform, &config).await);
    assert_eq!(
        platform.deployment_requests(),
        vec![CreateDeploymentRequest::redeploy("dpl_new")]
    );
}
