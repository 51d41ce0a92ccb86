//! Race state generator
//!
//! The RaceEngine is the heart of the mock feed, responsible for:
//! - Drawing a fresh race state for every request
//! - Rendering the 40-car snapshot from that state
//! - Keeping generation deterministic when a seed is configured
//! - Tracking how many snapshots have been served

mod generator;
mod roster;
mod state;

pub use generator::*;
pub use roster::*;
pub use state::*;

use std::time::{Duration, Instant};

use chrono::Utc;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::config::GeneratorConfig;
use crate::types::LiveFeed;

/// Shared snapshot generator
///
/// The random source is the only state carried between requests; every
/// snapshot is drawn from scratch.
pub struct RaceEngine {
    config: GeneratorConfig,
    rng: Mutex<StdRng>,
    state: EngineState,
    start_time: Instant,
}

impl RaceEngine {
    pub fn new(config: GeneratorConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            config,
            rng: Mutex::new(rng),
            state: EngineState::new(),
            start_time: Instant::now(),
        }
    }

    /// Create an engine with a fixed seed
    pub fn with_seed(seed: u64) -> Self {
        Self::new(GeneratorConfig {
            seed: Some(seed),
            ..Default::default()
        })
    }

    /// Generate a brand new race snapshot
    pub fn snapshot(&self) -> LiveFeed {
        let start = Instant::now();
        let feed = {
            let mut rng = self.rng.lock();
            generate_snapshot(&mut *rng, self.config.laps_in_race, Utc::now())
        };
        let took = start.elapsed();

        debug!(
            race_id = feed.race_id,
            lap = feed.lap_number,
            flag = %feed.flag_state,
            track = %feed.track_name,
            took_us = took.as_micros() as u64,
            "Generated race snapshot"
        );

        self.state.record_snapshot(&feed, took);
        feed
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn stats(&self) -> EngineStats {
        self.state.stats()
    }

    pub fn reset_stats(&self) {
        self.state.reset();
    }
}

impl Default for RaceEngine {
    fn default() -> Self {
        Self::new(GeneratorConfig::default())
    }
}
