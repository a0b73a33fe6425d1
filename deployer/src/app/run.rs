//! Entry points for the reconcile run and the health-check server

use std::future::Future;
use std::sync::Arc;

use tracing::info;

use crate::app::config::Config;
use crate::app::options::ServerOptions;
use crate::deploy::reconciler::{reconcile, RunReport};
use crate::errors::DeployerError;
use crate::http::client::HttpClient;
use crate::server::serve::serve;
use crate::server::state::ServerState;

/// Run one reconcile pass against the configured platform
pub async fn run_reconcile(config: &Config) -> Result<RunReport, DeployerError> {
    info!("Using platform API at {}", config.api_base_url);
    let client = HttpClient::from_config(config)?;
    reconcile(&client, config).await
}

/// Run the health-check server until the shutdown signal resolves
pub async fn run_server(
    options: ServerOptions,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), DeployerError> {
    let state = Arc::new(ServerState::default());
    let handle = serve(&options, state, shutdown_signal).await?;

    handle
        .await
        .map_err(|e| DeployerError::Server(e.to_string()))??;

    info!("Shutdown complete");
    Ok(())
}
