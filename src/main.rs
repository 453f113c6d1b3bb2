use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tokio::signal;
use tracing::{error, info};
use uuid::Uuid;

use hire_sync::cli::{Cli, Command};
use hire_sync::{HireOrchestrator, HireSyncConfig, server, telemetry};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {e:#}");
        eprintln!("hire-sync: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let config_path = HireSyncConfig::resolve_path(cli.config.as_deref());
    let mut config = HireSyncConfig::load(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    let log_level = if cli.verbose { "debug" } else { config.log_level.as_str() };
    telemetry::init(log_level, config.log_format).context("failed to initialize logging")?;

    config.validate().context("configuration validation failed")?;

    match cli.command {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            serve(&config).await
        }
        Command::Replay { file, request_id } => replay(&config, &file, request_id).await,
    }
}

async fn serve(config: &HireSyncConfig) -> Result<()> {
    let orchestrator =
        Arc::new(HireOrchestrator::from_config(config).context("failed to build HTTP clients")?);
    let app = server::router(orchestrator);

    let addr = config.listen_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(%addr, pinpoint = %config.pinpoint_base_url, hibob = %config.hibob_base_url, "hire-sync listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("hire-sync stopped");
    Ok(())
}

async fn replay(config: &HireSyncConfig, file: &Path, request_id: Option<String>) -> Result<()> {
    let payload = if file == Path::new("-") {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("failed to read payload from stdin")?;
        buf
    } else {
        std::fs::read(file).with_context(|| format!("failed to read {}", file.display()))?
    };

    let orchestrator =
        HireOrchestrator::from_config(config).context("failed to build HTTP clients")?;
    let request_id = request_id.unwrap_or_else(|| Uuid::new_v4().to_string());
    let response = orchestrator.handle(&payload, &request_id).await;

    println!("{}", serde_json::to_string_pretty(&response.body)?);
    if !response.is_success() {
        bail!("workflow returned status {}", response.status_code);
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
