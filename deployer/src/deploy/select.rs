//! Naming and selection rules for preview deployments

use std::cmp::Reverse;

use openapi_client::models::{Deployment, EnvVar};

/// Environment variable holding the preview API URL
pub const API_URL_ENV_KEY: &str = "VITE_API_URL";

/// `https://api.pr-<branch>.deploy-preview.<domain>`. The branch is used verbatim.
pub fn derive_target_url(branch: &str, base_domain: &str) -> String {
    format!("https://api.pr-{}.deploy-preview.{}", branch, base_domain)
}

/// Display name of a fresh preview deployment
pub fn preview_name(branch: &str) -> String {
    format!("pr-{}", branch)
}

/// A deployment belongs to the branch when the platform recorded that branch as its
/// source, or its name contains the branch case-insensitively.
pub fn branch_matches(deployment: &Deployment, branch: &str) -> bool {
    deployment.branch_ref() == Some(branch)
        || deployment
            .name
            .to_lowercase()
            .contains(&branch.to_lowercase())
}

/// First active (READY or BUILDING) deployment of the branch, in list order
pub fn select_deployment<'a>(deployments: &'a [Deployment], branch: &str) -> Option<&'a Deployment> {
    deployments
        .iter()
        .find(|d| d.state.is_active() && branch_matches(d, branch))
}

/// First environment variable with the preview API URL key
pub fn select_env_var(envs: &[EnvVar]) -> Option<&EnvVar> {
    envs.iter().find(|env| env.key == API_URL_ENV_KEY)
}

/// Stable sort, newest first. Deployments without a creation time keep their
/// relative order after the timestamped ones.
pub fn order_most_recent_first(deployments: &mut [Deployment]) {
    deployments.sort_by_key(|d| (d.created.is_none(), Reverse(d.created)));
}
