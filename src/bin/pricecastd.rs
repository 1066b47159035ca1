//! pricecastd: price prediction daemon.
//!
//! Loads the model artifact once and serves predictions over HTTP. A model
//! that fails to load does not stop the daemon: it starts in degraded mode
//! and answers every prediction with a "model not loaded" error.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use pricecast::server::config::Config;
use pricecast::{ModelHandle, PredictionService};

/// Pricecast daemon, the order price prediction service.
#[derive(Parser)]
#[command(name = "pricecastd")]
#[command(version = pricecast::PKG_VERSION)]
#[command(about = "Pricecast price prediction daemon")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Model artifact (overrides `[model] path`).
    #[arg(short, long, env = "PRICECAST_MODEL")]
    model: Option<PathBuf>,

    /// Interface to bind (overrides `[server] host`).
    #[arg(long, env = "PRICECAST_HOST")]
    host: Option<String>,

    /// Port to listen on (overrides `[server] port`).
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: info; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    // Load configuration, then apply CLI/env overrides
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(model) = args.model {
        config.model.path = model;
    }
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let addr = config.server.address()?;
    let assembler = config.features.assembler()?;

    info!(version = pricecast::version_string(), %addr, "pricecastd starting");

    let model = match ModelHandle::load(&config.model.path) {
        Ok(model) => Some(model),
        Err(e) => {
            error!(path = %config.model.path.display(), error = %e, "model failed to load");
            warn!("starting in degraded mode: predictions will fail until restart");
            None
        }
    };

    if let Some(model) = &model {
        let width = assembler.target_width(model);
        if width != model.expected_width() {
            warn!(
                expected = model.expected_width(),
                configured = width,
                "feature width does not match the model; predictions will be rejected"
            );
        }
    }

    let service = PredictionService::new(model)
        .with_assembler(assembler)
        .with_catalog_policy(config.validation.catalog);

    let listener = TcpListener::bind(addr).await?;
    pricecast::server::serve(listener, Arc::new(service), shutdown_signal()).await?;

    info!("pricecastd stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
