//! Configuration module for the race feed
//!
//! Provides hierarchical configuration with support for:
//! - YAML/TOML/JSON config files
//! - Environment variable overrides
//! - Validation
//!
//! Upload jobs are configured separately, from the environment only; see
//! [`jobs`](self::jobs).

pub mod jobs;

pub use jobs::*;

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::engine::{DEFAULT_LAPS_IN_RACE, MAX_LAP};
use crate::error::{FeedError, FeedResult};
use crate::types::STAGE_TWO_END;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Snapshot generation settings
    pub generator: GeneratorConfig,
    /// Telemetry settings
    pub telemetry: TelemetryConfig,
    /// Cross-origin settings for browser clients
    pub cors: CorsConfig,
}

impl FeedConfig {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> FeedResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| FeedError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Self = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .map_err(|e| FeedError::Config(format!("YAML parse error: {}", e)))?,
            Some("toml") => toml::from_str(&content)
                .map_err(|e| FeedError::Config(format!("TOML parse error: {}", e)))?,
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| FeedError::Config(format!("JSON parse error: {}", e)))?,
            _ => return Err(FeedError::Config(
                "Unsupported config file format. Use .yaml, .toml, or .json".to_string()
            )),
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides
    pub fn from_env() -> FeedResult<Self> {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `RACE_FEED_*` overrides from the given lookup
    pub fn apply_env<F>(&mut self, lookup: F) -> FeedResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("RACE_FEED_PORT") {
            self.server.port = port.parse().map_err(|_| {
                FeedError::Config("Invalid port number".to_string())
            })?;
        }

        if let Some(host) = lookup("RACE_FEED_HOST") {
            self.server.host = host;
        }

        if let Some(seed) = lookup("RACE_FEED_SEED") {
            self.generator.seed = Some(seed.parse().map_err(|_| {
                FeedError::Config("Invalid seed value".to_string())
            })?);
        }

        if let Some(laps) = lookup("RACE_FEED_LAPS_IN_RACE") {
            self.generator.laps_in_race = laps.parse().map_err(|_| {
                FeedError::Config("Invalid laps_in_race value".to_string())
            })?;
        }

        Ok(())
    }

    pub fn validate(&self) -> FeedResult<()> {
        self.server.validate()?;
        self.generator.validate()?;
        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
    /// How long shutdown waits for in-flight requests, in seconds
    pub drain_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: crate::DEFAULT_PORT,
            request_timeout_secs: 30,
            drain_timeout_secs: 10,
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> FeedResult<()> {
        if self.port == 0 {
            return Err(FeedError::Validation {
                message: "Port cannot be 0".to_string(),
                param: Some("server.port".to_string()),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(FeedError::Validation {
                message: "request_timeout_secs must be greater than 0".to_string(),
                param: Some("server.request_timeout_secs".to_string()),
            });
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn drain_timeout(&self) -> Duration {
        Duration::from_secs(self.drain_timeout_secs)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> FeedResult<std::net::SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| FeedError::Config(format!("Invalid socket address: {}", e)))
    }
}

/// Snapshot generation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Seed for deterministic snapshots (None = random)
    pub seed: Option<u64>,
    /// Scheduled race distance
    pub laps_in_race: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: None,
            laps_in_race: DEFAULT_LAPS_IN_RACE,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> FeedResult<()> {
        // Stage 3 needs at least one lap after the second stage break.
        if self.laps_in_race <= STAGE_TWO_END || self.laps_in_race > MAX_LAP * 4 {
            return Err(FeedError::Validation {
                message: format!(
                    "laps_in_race must be between {} and {}",
                    STAGE_TWO_END + 1,
                    MAX_LAP * 4
                ),
                param: Some("generator.laps_in_race".to_string()),
            });
        }
        Ok(())
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Enable telemetry
    pub enabled: bool,
    /// Log level
    pub log_level: String,
    /// Enable JSON logging
    pub json_logs: bool,
    /// Service name attached to the startup log line
    pub service_name: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_level: "info".to_string(),
            json_logs: false,
            service_name: "race-feed-simulator".to_string(),
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed origins; `*` allows any
    pub allowed_origins: Vec<String>,
    /// Preflight cache lifetime in seconds
    pub max_age_secs: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
            max_age_secs: 3600,
        }
    }
}
