//! Caption backend tracker.
//!
//! # Architecture Overview
//!
//! ```text
//!   notebook / GPU host                     registry (this binary)
//!   ───────────────────                     ─────────────────────────────
//!   POST /url {url} ───────────────────────▶ http::handlers ─▶ registry::RegistryStore
//!                                                                (current + history)
//!   desktop client                                                   │
//!   ───────────────────                                              │
//!   discovery::DiscoveryClient ── GET /url ◀─────────────────────────┘
//!        │ probe {backend}/health
//!        ▼
//!   orchestrator::CaptionOrchestrator ── POST {backend}/generate-captions ──▶ GPU backend
//! ```
//!
//! The binary serves the registry only; the client core lives in the library
//! and is driven by `tracker-cli`.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use caption_tracker::config::{default_config, load_config};
use caption_tracker::lifecycle::signals::spawn_signal_listener;
use caption_tracker::observability::{logging, metrics};
use caption_tracker::{Shutdown, TrackerServer};

#[derive(Parser)]
#[command(name = "caption-tracker")]
#[command(about = "Registry for the current caption backend address", long_about = None)]
struct Args {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => default_config()?,
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "caption-tracker starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        stale_after_secs = ?config.registry.stale_after_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    spawn_signal_listener(&shutdown);

    let server = TrackerServer::new(&config);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
