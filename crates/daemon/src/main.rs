//! Jobmatch - Main Entry Point
//! HTTP query API over SQLite, with cluster-based recommendations

mod settings;
mod telemetry;

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::settings::{LogFormat, Settings};
use crate::telemetry::BoxedLayer;
use jobmatch_api_http::{AppState, HttpServer, HttpServerConfig};
use jobmatch_core::application::{JobCommandService, JobQueryService};
use jobmatch_core::port::time_provider::SystemTimeProvider;
use jobmatch_core::port::JobRepository;
use jobmatch_infra_cluster::HttpClusterResolver;
use jobmatch_infra_sqlite::{create_pool, run_migrations, SqliteJobRepository};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Console output plus optional daily-rolling JSON file and OTLP export.
/// The returned guard must live until exit or buffered file lines are lost.
fn init_logging(settings: &Settings) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("jobmatch=info"))
        .context("Failed to create env filter")?;

    let mut layers: Vec<BoxedLayer> = Vec::new();
    match settings.log_format {
        // Production: JSON structured logging
        LogFormat::Json => layers.push(fmt::layer().json().boxed()),
        // Development: Pretty formatting with colors
        LogFormat::Pretty => layers.push(fmt::layer().pretty().boxed()),
    }

    let guard = match settings.log_dir() {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(&dir, "jobmatch.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            layers.push(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(writer)
                    .boxed(),
            );
            Some(guard)
        }
        None => None,
    };

    let otel_error = match telemetry::otel_layer() {
        Ok(Some(layer)) => {
            layers.push(layer);
            None
        }
        Ok(None) => None,
        Err(e) => Some(e),
    };

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    if let Some(e) = otel_error {
        warn!(error = %e, "OpenTelemetry disabled (continuing without it)");
    }
    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Configuration + logging
    let settings = Settings::load()?;
    let _log_guard = init_logging(&settings)?;

    info!("Jobmatch v{} starting...", VERSION);

    // 2. Database
    info!(database_url = %settings.database_url, "Initializing database...");
    let pool = create_pool(&settings.database_url)
        .await
        .context("DB pool creation failed")?;
    run_migrations(&pool).await.context("Migration failed")?;

    // 3. DI wiring
    let time_provider = Arc::new(SystemTimeProvider);
    let jobs: Arc<dyn JobRepository> = Arc::new(SqliteJobRepository::new(pool.clone()));
    let resolver = Arc::new(
        HttpClusterResolver::new(&settings.cluster_base_url, settings.cluster_timeout())
            .context("Cluster client creation failed")?,
    );
    info!(
        cluster_base_url = %settings.cluster_base_url,
        timeout_ms = settings.cluster_timeout_ms,
        "Cluster service configured"
    );

    let queries = Arc::new(JobQueryService::new(jobs.clone(), resolver));
    let commands = Arc::new(JobCommandService::new(jobs, queries.clone(), time_provider));
    let state = AppState {
        queries,
        commands,
        limits: settings.page_limits(),
    };

    // 4. HTTP server
    let http_config = HttpServerConfig {
        host: settings.http_host.clone(),
        port: settings.http_port,
    };
    let server = HttpServer::new(http_config, state)
        .start()
        .await
        .context("HTTP server start failed")?;

    info!(addr = %server.local_addr(), "System ready. Press Ctrl+C to shutdown");

    // 5. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received. Exiting gracefully...");

    server.stop().await;
    pool.close().await;
    telemetry::shutdown();

    info!("Shutdown complete.");
    Ok(())
}
