//! fixroute node — entry point.
//!
//! Loads the TOML configuration, indexes the upstream gossip store and serves
//! the fixed-route API until interrupted.

mod api;
mod config;
mod node;
mod state;
mod upstream;

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use config::FixrouteConfig;
use node::FixrouteNode;

/// fixroute node
#[derive(Parser, Debug)]
#[command(name = "fixroute-node", version, about = "Fixed-waypoint Lightning route builder")]
struct Args {
    /// Path to the configuration file (TOML).
    #[arg(short, long, default_value = "fixroute.toml")]
    config: PathBuf,

    /// Override the API port.
    #[arg(long)]
    api_port: Option<u16>,

    /// Override the Core Lightning REST endpoint.
    #[arg(long)]
    upstream: Option<String>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,

    /// Generate a default config file and exit.
    #[arg(long)]
    init: bool,
}

fn init_tracing(config: &FixrouteConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    if config.logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.init {
        if args.config.exists() {
            anyhow::bail!("configuration file already exists at {}", args.config.display());
        }
        FixrouteConfig::default().save(&args.config)?;
        println!("Wrote default config to {}", args.config.display());
        return Ok(());
    }

    let mut config = FixrouteConfig::load(&args.config)?;

    // Apply CLI overrides
    if let Some(api_port) = args.api_port {
        config.api.port = api_port;
    }
    if let Some(upstream) = args.upstream {
        config.upstream.endpoint = upstream;
    }
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }

    init_tracing(&config);
    tracing::info!("fixroute node v{}", env!("CARGO_PKG_VERSION"));

    let mut node = FixrouteNode::new(config)?;
    node.start().await?;

    let shutdown = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("received shutdown signal"),
            Err(e) => tracing::error!(error = %e, "failed to listen for ctrl-c"),
        }
    };

    tokio::select! {
        result = node.run() => {
            if let Err(e) = result {
                tracing::error!(error = %e, "API server error");
            }
        }
        _ = shutdown => {
            tracing::info!("initiating graceful shutdown");
        }
    }

    node.shutdown().await?;
    tracing::info!("fixroute node exited cleanly");
    Ok(())
}
