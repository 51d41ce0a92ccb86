//! CLI command implementations

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};

use crate::config::{FeedConfig, SheetsJobConfig, StorageJobConfig, TelemetryConfig};
use crate::engine::RaceEngine;
use crate::export::{feed_vehicles, leaderboard_csv, race_metadata_csv};
use crate::jobs::{
    FeedFetcher, GoogleSheetsClient, R2Client, ServiceAccount, SheetsSyncJob, StorageSyncJob,
};
use crate::telemetry::{init_telemetry, shutdown_telemetry};
use crate::VERSION;

use super::{Cli, Commands, GenerateCommand, HealthCommand, OutputFormat, ServeCommand};

/// Execute the CLI command
///
/// Only `serve` and `generate` read the feed configuration; the upload jobs
/// are configured from their own environment variables.
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Serve(cmd) => {
            let config = load_feed_config(cli.config.as_deref(), &cli.log_level, cli.json_logs)?;
            execute_serve(cmd, config, cli.quiet).await
        }
        Commands::Generate(cmd) => {
            let config = load_feed_config(cli.config.as_deref(), &cli.log_level, cli.json_logs)?;
            execute_generate(cmd, config)
        }
        Commands::Health(cmd) => execute_health(cmd).await,
        Commands::SyncSheets => {
            init_telemetry(&job_telemetry(&cli.log_level, cli.json_logs))?;
            let result = execute_sync_sheets().await;
            shutdown_telemetry();
            result
        }
        Commands::SyncStorage => {
            init_telemetry(&job_telemetry(&cli.log_level, cli.json_logs))?;
            let result = execute_sync_storage().await;
            shutdown_telemetry();
            result
        }
        Commands::Version => execute_version(),
    }
}

fn load_feed_config(path: Option<&Path>, log_level: &str, json_logs: bool) -> Result<FeedConfig> {
    let mut config = match path {
        Some(path) => FeedConfig::from_file(path)?,
        None => FeedConfig::from_env()?,
    };

    config.telemetry.log_level = log_level.to_string();
    config.telemetry.json_logs = json_logs;
    Ok(config)
}

/// Logging for the upload jobs, taken from the global flags alone
pub fn job_telemetry(log_level: &str, json_logs: bool) -> TelemetryConfig {
    TelemetryConfig {
        log_level: log_level.to_string(),
        json_logs,
        ..TelemetryConfig::default()
    }
}

/// Fold serve flags into the loaded configuration
pub fn apply_serve_overrides(cmd: &ServeCommand, config: &mut FeedConfig) {
    if let Some(port) = cmd.port {
        config.server.port = port;
    }
    if let Some(host) = &cmd.host {
        config.server.host = host.clone();
    }
    if let Some(seed) = cmd.seed {
        config.generator.seed = Some(seed);
    }
    if let Some(laps) = cmd.laps_in_race {
        config.generator.laps_in_race = laps;
    }
    if let Some(timeout) = cmd.timeout {
        config.server.request_timeout_secs = timeout;
    }
    if let Some(drain) = cmd.drain_period {
        config.server.drain_timeout_secs = drain;
    }
}

async fn execute_serve(cmd: ServeCommand, mut config: FeedConfig, quiet: bool) -> Result<()> {
    apply_serve_overrides(&cmd, &mut config);
    config.validate().context("Configuration validation failed")?;

    if !quiet {
        print_banner(&config);
    }

    crate::run_server(config).await
}

fn execute_generate(cmd: GenerateCommand, mut config: FeedConfig) -> Result<()> {
    if cmd.seed.is_some() {
        config.generator.seed = cmd.seed;
    }
    if let Some(laps) = cmd.laps_in_race {
        config.generator.laps_in_race = laps;
    }
    config.generator.validate()?;

    let feed = RaceEngine::new(config.generator).snapshot();

    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string(&feed)?),
        OutputFormat::Pretty => println!("{}", serde_json::to_string_pretty(&feed)?),
        OutputFormat::LeaderboardCsv => {
            let value = serde_json::to_value(&feed)?;
            print!("{}", leaderboard_csv(feed_vehicles(&value).unwrap_or_default())?);
        }
        OutputFormat::MetadataCsv => {
            let value = serde_json::to_value(&feed)?;
            print!("{}", race_metadata_csv(&value)?);
        }
    }

    Ok(())
}

async fn execute_health(cmd: HealthCommand) -> Result<()> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(cmd.timeout))
        .build()?;

    let url = format!("{}/health", cmd.url.trim_end_matches('/'));
    let start = Instant::now();

    match client.get(&url).send().await {
        Ok(response) => {
            let latency = start.elapsed();
            let status = response.status();
            let body: serde_json::Value = response.json().await.unwrap_or_default();

            match cmd.format.as_str() {
                "json" => {
                    let result = serde_json::json!({
                        "url": url,
                        "status": status.as_u16(),
                        "latency_ms": latency.as_millis(),
                        "response": body,
                    });
                    println!("{}", serde_json::to_string_pretty(&result)?);
                }
                _ => {
                    let mark = if status.is_success() { "✓" } else { "✗" };
                    println!(
                        "{} {} - Status: {} - Latency: {:?}",
                        mark,
                        url,
                        status.as_u16(),
                        latency
                    );
                    if let Some(message) = body.get("message").and_then(|m| m.as_str()) {
                        println!("  {}", message);
                    }
                }
            }

            if status.is_success() {
                Ok(())
            } else {
                bail!("Health check failed with status {}", status)
            }
        }
        Err(e) => {
            match cmd.format.as_str() {
                "json" => {
                    let result = serde_json::json!({ "url": url, "error": e.to_string() });
                    println!("{}", serde_json::to_string_pretty(&result)?);
                }
                _ => println!("✗ {} - Error: {}", url, e),
            }
            bail!("Health check failed: {}", e)
        }
    }
}

async fn execute_sync_sheets() -> Result<()> {
    let config = SheetsJobConfig::from_env()?;
    let account = ServiceAccount::from_file(&config.credentials_path)?;
    let store = GoogleSheetsClient::connect(&account)
        .await
        .context("Error setting up Google Sheets")?;
    let fetcher = FeedFetcher::new(config.live_feed_url)?;

    let job = SheetsSyncJob::new(fetcher, store, config.sheet_name);
    if job.run_once().await {
        println!("Update completed successfully");
        Ok(())
    } else {
        bail!("Update failed")
    }
}

async fn execute_sync_storage() -> Result<()> {
    let config = StorageJobConfig::from_env()?;
    let store = R2Client::new(&config)?;
    let fetcher = FeedFetcher::new(config.live_feed_url.clone())?;

    let job = StorageSyncJob::new(fetcher, store);
    if job.run_once().await {
        println!("Export completed successfully");
        Ok(())
    } else {
        bail!("Export failed")
    }
}

fn execute_version() -> Result<()> {
    println!("race-feed-simulator {}", VERSION);
    println!();
    println!("Build Information:");
    println!("  Version:       {}", VERSION);
    println!("  Rust Version:  {}", env!("CARGO_PKG_RUST_VERSION"));
    println!();
    println!("Commands:");
    println!("  serve          Mock live feed over HTTP");
    println!("  sync-sheets    Live feed to Google Sheets");
    println!("  sync-storage   Live feed to Cloudflare R2");
    Ok(())
}

fn print_banner(config: &FeedConfig) {
    let base = format!("http://{}:{}", config.server.host, config.server.port);

    println!();
    println!("Race Feed Simulator v{}", VERSION);
    println!();
    println!("Configuration:");
    println!("  • Server:    {}:{}", config.server.host, config.server.port);
    println!("  • Laps:      {}", config.generator.laps_in_race);
    println!(
        "  • Seed:      {}",
        config.generator.seed.map_or("random".to_string(), |s| s.to_string())
    );
    println!();
    println!("Endpoints:");
    println!("  • Live feed: {}/live-feed", base);
    println!("  • Health:    {}/health", base);
    println!("  • Stats:     {}/admin/stats", base);
    println!();
}
