//! Preview Deployer - Entry Point
//!
//! Points a branch's preview deployment at its own API URL and triggers a
//! redeploy (or a fresh build) on the hosting platform. `--serve` runs the
//! health-check server instead.

use std::collections::HashMap;
use std::env;
use std::process;

use colored::Colorize;
use preview_deployer::app::config::Config;
use preview_deployer::app::options::ServerOptions;
use preview_deployer::app::run::{run_reconcile, run_server};
use preview_deployer::deploy::reconciler::{DeployMode, EnvVarOutcome, RunReport};
use preview_deployer::errors::DeployerError;
use preview_deployer::logs::{init_logging, LogLevel, LogOptions};
use preview_deployer::utils::version_info;

use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let mut cli_args: HashMap<String, String> = HashMap::new();
    for arg in env::args().skip(1) {
        if let Some((key, value)) = arg.split_once('=') {
            // --key=value
            cli_args.insert(key.trim_start_matches('-').to_string(), value.to_string());
        } else if arg.starts_with("--") {
            // --flag
            cli_args.insert(arg.trim_start_matches('-').to_string(), "true".to_string());
        }
    }

    if cli_args.contains_key("version") {
        match serde_json::to_string_pretty(&version_info()) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Failed to render version info: {}", e),
        }
        return;
    }

    if cli_args.contains_key("serve") {
        process::exit(serve(&cli_args).await);
    }

    process::exit(deploy(&cli_args).await);
}

async fn serve(cli_args: &HashMap<String, String>) -> i32 {
    let mut log_options = match LogOptions::from_env() {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            return DeployerError::from(e).exit_code();
        }
    };
    apply_log_overrides(&mut log_options, cli_args);
    if let Err(e) = init_logging(&log_options) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let options = match ServerOptions::from_env() {
        Ok(options) => options,
        Err(e) => {
            error!("{}", e);
            return DeployerError::from(e).exit_code();
        }
    };

    match run_server(options, await_shutdown_signal()).await {
        Ok(()) => 0,
        Err(e) => {
            error!("Health-check server failed: {}", e);
            e.exit_code()
        }
    }
}

async fn deploy(cli_args: &HashMap<String, String>) -> i32 {
    // Configuration is validated before logging is set up or anything is sent
    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            return DeployerError::from(e).exit_code();
        }
    };

    apply_log_overrides(&mut config.log, cli_args);
    if let Err(e) = init_logging(&config.log) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    match run_reconcile(&config).await {
        Ok(report) => {
            print_summary(&report);
            0
        }
        Err(e) => {
            error!("Preview deployment failed: {}", e);
            eprintln!("{} {}", "✗".red().bold(), e);
            e.exit_code()
        }
    }
}

fn apply_log_overrides(options: &mut LogOptions, cli_args: &HashMap<String, String>) {
    if let Some(level) = cli_args.get("log-level") {
        match level.parse::<LogLevel>() {
            Ok(level) => options.log_level = level,
            Err(e) => eprintln!("Ignoring --log-level: {}", e),
        }
    }
    if cli_args.contains_key("json-logs") {
        options.json_format = true;
    }
}

fn print_summary(report: &RunReport) {
    match &report.env_var {
        EnvVarOutcome::Created => {
            println!("{} VITE_API_URL created: {}", "✓".green(), report.target_api_url)
        }
        EnvVarOutcome::Updated { .. } => {
            println!("{} VITE_API_URL updated: {}", "✓".green(), report.target_api_url)
        }
        EnvVarOutcome::Failed(reason) => {
            println!("{} VITE_API_URL not updated: {}", "!".yellow(), reason)
        }
    }

    let action = match report.deployment.mode {
        DeployMode::Redeployed => "Redeploy triggered",
        DeployMode::Created => "Deployment created",
        DeployMode::CreatedAfterFallback => "Redeploy failed, deployment created",
    };
    let id = report.deployment.id.as_deref().unwrap_or("unknown id");
    match &report.deployment.url {
        Some(url) => println!("{} {} ({}): {}", "✓".green(), action, id, url.cyan()),
        None => println!("{} {} ({}), no URL reported yet", "✓".green(), action, id),
    }
}

async fn await_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => {
                        info!("SIGTERM received, shutting down...");
                    }
                    _ = tokio::signal::ctrl_c() => {
                        info!("Ctrl+C received, shutting down...");
                    }
                }
            }
            Err(e) => {
                error!("Unable to listen for SIGTERM: {}", e);
                let _ = tokio::signal::ctrl_c().await;
                info!("Ctrl+C received, shutting down...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Unable to listen for Ctrl+C: {}", e);
        }
        info!("Ctrl+C received, shutting down...");
    }
}
