//! CLI interface for trademind
//!
//! Provides subcommands for:
//! - `serve`: Ingest the feed and serve signals and snapshots
//! - `config`: Show the effective configuration

mod serve;

pub use serve::ServeArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "trademind")]
#[command(about = "Real-time crypto prices, technical signals and market snapshots")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ingest the price feed and serve the HTTP/WebSocket API
    Serve(ServeArgs),
    /// Show the effective configuration
    Config,
}
