// Main entry point - Dependency injection and run loop
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use axum::{Router, routing::get};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use crate::application::ports::SnapshotSink;
use crate::application::snapshot_service::SnapshotService;
use crate::infrastructure::config::{AppConfig, RunMode, load_app_config};
use crate::infrastructure::grid_api_client::GridApiClient;
use crate::infrastructure::json_file_sink::JsonFileSink;
use crate::infrastructure::mapping_file::MappingFile;
use crate::infrastructure::memory_sink::MemorySink;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{health_check, latest_snapshot};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_app_config()?;

    match config.run.mode {
        RunMode::Once => run_once(&config).await,
        RunMode::Serve => serve(&config).await,
    }
}

fn build_service(config: &AppConfig, extra_sinks: Vec<Arc<dyn SnapshotSink>>) -> anyhow::Result<SnapshotService> {
    // Adapters (infrastructure layer)
    let source = Arc::new(GridApiClient::new(
        config.source.url_template.clone(),
        Duration::from_secs(config.source.timeout_secs),
    )?);
    let mapping = Arc::new(MappingFile::new(&config.mapping.path));
    let file_sink: Arc<dyn SnapshotSink> =
        Arc::new(JsonFileSink::new(&config.output.dir, config.output.latest_file.clone()));

    let mut sinks = vec![file_sink];
    sinks.extend(extra_sinks);

    Ok(SnapshotService::new(source, mapping, sinks, config.source.areas.clone()))
}

async fn run_once(config: &AppConfig) -> anyhow::Result<()> {
    let service = build_service(config, Vec::new())?;
    let summary = service.run().await?;
    tracing::info!(
        "{} updated: {} lines",
        config.output.latest_file,
        summary.lines
    );
    Ok(())
}

/// Run immediately, then once per interval. A failed run is logged and the
/// next tick tries again.
async fn refresh_loop(service: SnapshotService, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    loop {
        ticker.tick().await;
        if let Err(e) = service.run().await {
            tracing::error!("snapshot run failed: {:#}", e);
        }
    }
}

async fn serve(config: &AppConfig) -> anyhow::Result<()> {
    let memory = MemorySink::new();
    let memory_sink: Arc<dyn SnapshotSink> = Arc::new(memory.clone());
    let service = build_service(config, vec![memory_sink])?;

    let interval = Duration::from_secs(config.run.interval_secs.max(1));
    tokio::spawn(refresh_loop(service, interval));

    let state = Arc::new(AppState { snapshots: memory });
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/snapshot/latest", get(latest_snapshot))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = config
        .run
        .listen
        .parse()
        .with_context(|| format!("invalid listen address {}", config.run.listen))?;
    tracing::info!(%addr, interval_secs = interval.as_secs(), "starting powerflow-snapshot server");

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
