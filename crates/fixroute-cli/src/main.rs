//! fixroute CLI — command-line interface for a running fixroute node.
//!
//! Subcommands: init, route, purge, status.

mod commands;

use clap::{Parser, Subcommand};

/// fixroute — source routes through fixed Lightning waypoints.
#[derive(Parser, Debug)]
#[command(name = "fixroute", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a default fixroute node configuration.
    Init(commands::init::InitArgs),
    /// Build a route through the given waypoints.
    Route(commands::route::RouteArgs),
    /// Reindex the node's gossip store.
    Purge(commands::purge::PurgeArgs),
    /// Query the status of a running node.
    Status(commands::status::StatusArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Init(args) => commands::init::run(args),
        Commands::Route(args) => commands::route::run(args).await,
        Commands::Purge(args) => commands::purge::run(args).await,
        Commands::Status(args) => commands::status::run(args).await,
    }
}
