//! riskscan Server - health-risk prediction over HTTP
//!
//! Loads the model artifact once at startup and serves `POST /predict`.
//! Metrics are pushed via structured JSON logs to stdout.
//!
//! # Usage
//! ```sh
//! MODEL_PATH=models/diabetes.json cargo run --bin server
//! curl -X POST http://localhost:8000/predict -H "Content-Type: application/json" \
//!   -d '{"highBP":1,"highChol":1,"cholCheck":1,"bmi":32.5, ...}'
//! ```
//!
//! # Environment Variables
//! - `SERVER_HOST` / `SERVER_PORT` - Listen address (default: 0.0.0.0:8000)
//! - `MODEL_PATH` - Model artifact (default: model.json)
//! - `DATABASE_URL` - Optional database checked at startup
//! - `OBSERVABILITY_ENABLED` - Enable metrics reporting (default: true)
//! - `OBSERVABILITY_INTERVAL` - Interval in seconds between metric outputs (default: 60)
//! - `LOG_FORMAT` - `pretty` or `json`

use anyhow::{Context, Result};
use clap::Parser;
use riskscan::application::system::Application;
use riskscan::config::{Config, LogFormat};
use riskscan::infrastructure::observability::MetricsReporter;
use riskscan::interfaces::http;
use std::path::PathBuf;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(author, version, about = "Health risk prediction server", long_about = None)]
struct Cli {
    /// Listen host (overrides SERVER_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Listen port (overrides SERVER_PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Model artifact path (overrides MODEL_PATH)
    #[arg(short, long)]
    model: Option<PathBuf>,
}

fn init_logging(format: LogFormat) {
    let filter =
        tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into());

    match format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(false).pretty())
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    init_logging(config.observability.log_format);

    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(model) = cli.model {
        config.model.path = model;
    }

    info!("riskscan Server {} starting...", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration loaded: Listen={}:{}, Model={}",
        config.server.host,
        config.server.port,
        config.model.path.display()
    );

    let addr = config.server.socket_addr().await?;
    let app = Application::build(config.clone()).await?;

    if config.observability.enabled {
        let reporter =
            MetricsReporter::new(app.metrics.clone(), config.observability.interval_seconds);
        tokio::spawn(async move {
            reporter.run().await;
        });
        info!(
            "Metrics reporter started (interval: {}s)",
            config.observability.interval_seconds
        );
    } else {
        info!("Metrics reporting disabled.");
    }

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, http::router(app.service.clone()))
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutdown signal received. Exiting...");
        })
        .await
        .context("HTTP server failed")?;

    app.shutdown().await;
    Ok(())
}
