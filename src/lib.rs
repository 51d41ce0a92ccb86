//! # Race Feed Simulator
//!
//! Mock motorsport live-timing feed for frontend and pipeline development.
//!
//! Every request to `/live-feed` draws a fresh, internally consistent race:
//! 40 cars in a full running order, lap and stage counters that agree with
//! each other, and per-car lap, speed and pit-stop telemetry. Two relay jobs
//! pull that feed and publish it as tables, one to a Google spreadsheet and
//! one as CSV files in a Cloudflare R2 bucket.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use race_feed_simulator::{FeedConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     run_server(FeedConfig::default()).await
//! }
//! ```
//!
//! Generating a snapshot without the server:
//!
//! ```rust
//! use race_feed_simulator::RaceEngine;
//!
//! let engine = RaceEngine::with_seed(42);
//! let feed = engine.snapshot();
//! assert_eq!(feed.vehicles.len(), 40);
//! ```

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod jobs;
pub mod server;
pub mod telemetry;
pub mod types;

pub use config::FeedConfig;
pub use engine::RaceEngine;
pub use error::{FeedError, FeedResult};
pub use server::run_server;
pub use types::LiveFeed;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default server port
pub const DEFAULT_PORT: u16 = 5000;
