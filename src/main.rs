//! Storefront URL router (v1)
//!
//! Serves the storefront's URL surface: every request is matched against an
//! immutable route registry and handed to the sub-app that owns the route.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────────────┐
//!                 │                  STOREFRONT URLS                     │
//!                 │                                                      │
//!   Request       │  ┌─────────┐    ┌──────────┐    ┌────────────────┐   │
//!   ──────────────┼─▶│  http   │───▶│ dispatch │───▶│ RouterRegistry │   │
//!                 │  │ server  │    │          │    │ (ArcSwap)      │   │
//!                 │  └─────────┘    └────┬─────┘    └───────┬────────┘   │
//!                 │                      │                  │            │
//!                 │                      ▼                  ▼            │
//!   Response      │               ┌─────────────┐   ┌──────────────┐     │
//!   ◀─────────────┼───────────────│ app handler │   │   urlconf    │     │
//!                 │               │ (sub-apps)  │   │  + reverse   │     │
//!                 │               └─────────────┘   └──────────────┘     │
//!                 │                                                      │
//!                 │  config (TOML + watcher) · observability · lifecycle │
//!                 └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use storefront_urls::apps::placeholder::placeholder_apps;
use storefront_urls::config::validation::validate_config;
use storefront_urls::config::watcher::ConfigWatcher;
use storefront_urls::http::HttpServer;
use storefront_urls::lifecycle::{load_startup_config, signals, Overrides, Shutdown, StartupError};
use storefront_urls::observability::{logging, metrics};

#[derive(Parser)]
#[command(author, version, about = "Storefront URL router", long_about = None)]
struct Args {
    /// Path to the TOML config file; defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable development mode (diagnostics and static assets).
    #[arg(long)]
    dev: bool,

    /// Override the listener bind address.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let args = Args::parse();
    let overrides = Overrides {
        development_mode: args.dev,
        bind_address: args.bind,
    };

    let config = load_startup_config(args.config.as_deref(), &overrides)?;
    logging::init_logging(&config.observability)?;

    tracing::info!("storefront-urls v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        development_mode = config.site.development_mode,
        static_url = %config.site.static_url,
        "Configuration loaded"
    );

    // Route table errors stop startup before anything is bound.
    let server = HttpServer::new(config.clone(), placeholder_apps())?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let (update_tx, update_rx) = mpsc::unbounded_channel();

    // Keep the watcher alive for the lifetime of the server.
    let _watcher = match &args.config {
        Some(path) => {
            let (watcher, mut file_updates) = ConfigWatcher::new(path);
            let overrides = overrides.clone();
            tokio::spawn(async move {
                while let Some(mut config) = file_updates.recv().await {
                    overrides.apply(&mut config);
                    if let Err(errors) = validate_config(&config) {
                        for error in errors {
                            tracing::error!(error = %error, "Reloaded config rejected");
                        }
                        continue;
                    }
                    if update_tx.send(config).is_err() {
                        break;
                    }
                }
            });
            match watcher.run() {
                Ok(watcher) => Some(watcher),
                Err(e) => {
                    tracing::warn!(error = %e, "Config watcher unavailable, hot reload disabled");
                    None
                }
            }
        }
        None => None,
    };

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server_task = tokio::spawn(server.run(listener, update_rx, server_shutdown));

    signals::wait_for_shutdown(&shutdown).await;

    match server_task.await {
        Ok(result) => result?,
        Err(e) => tracing::error!(error = %e, "Server task failed"),
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
