//! Command-line interface
//!
//! One binary covers the feed server and both upload jobs, so a cron entry
//! and the server share the same build.

mod commands;

pub use commands::*;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::VERSION;

/// Mock motorsport live-timing feed and relay jobs
#[derive(Parser, Debug)]
#[command(name = "race-feed-simulator")]
#[command(version = VERSION)]
#[command(about = "Mock motorsport live-timing feed with spreadsheet and object-storage relay jobs")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file for the feed server (YAML, TOML, or JSON)
    #[arg(short, long, global = true, env = "RACE_FEED_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "RACE_FEED_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Enable JSON log output
    #[arg(long, global = true, env = "RACE_FEED_JSON_LOGS")]
    pub json_logs: bool,

    /// Suppress the startup banner
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the mock live feed
    #[command(alias = "s")]
    Serve(ServeCommand),

    /// Print one generated snapshot
    #[command(alias = "gen")]
    Generate(GenerateCommand),

    /// Health check a running feed
    Health(HealthCommand),

    /// Copy the live feed into a Google spreadsheet (configured from the environment)
    SyncSheets,

    /// Publish the live feed as CSV files to R2 (configured from the environment)
    SyncStorage,

    /// Show version and build information
    Version,
}

/// Serve the mock live feed
///
/// Flags override the config file and `RACE_FEED_*` variables.
#[derive(Parser, Debug)]
pub struct ServeCommand {
    /// Port to listen on
    #[arg(short, long, env = "RACE_FEED_PORT")]
    pub port: Option<u16>,

    /// Host to bind to
    #[arg(long, env = "RACE_FEED_HOST")]
    pub host: Option<String>,

    /// Fixed seed for a reproducible snapshot sequence
    #[arg(long, env = "RACE_FEED_SEED")]
    pub seed: Option<u64>,

    /// Scheduled race distance
    #[arg(long)]
    pub laps_in_race: Option<u32>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// How long shutdown waits for in-flight requests, in seconds
    #[arg(long)]
    pub drain_period: Option<u64>,
}

/// Print one generated snapshot
#[derive(Parser, Debug)]
pub struct GenerateCommand {
    /// Seed for the snapshot
    #[arg(long)]
    pub seed: Option<u64>,

    /// Scheduled race distance
    #[arg(long)]
    pub laps_in_race: Option<u32>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty")]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Compact JSON
    Json,
    /// Indented JSON
    Pretty,
    /// The leaderboard table as CSV
    LeaderboardCsv,
    /// The race metadata table as CSV
    MetadataCsv,
}

/// Health check a running feed
#[derive(Parser, Debug)]
pub struct HealthCommand {
    /// Base URL of the feed server
    #[arg(short, long, default_value = "http://localhost:5000")]
    pub url: String,

    /// Timeout in seconds
    #[arg(short, long, default_value = "5")]
    pub timeout: u64,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: String,
}
