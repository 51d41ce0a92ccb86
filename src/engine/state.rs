//! Engine statistics tracking

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::types::{FlagState, LiveFeed};

/// Thread-safe counters for generated snapshots
pub struct EngineState {
    snapshots: AtomicU64,
    caution_snapshots: AtomicU64,
    vehicles: AtomicU64,
    timings: RwLock<GenerationTimer>,
}

impl EngineState {
    pub fn new() -> Self {
        Self {
            snapshots: AtomicU64::new(0),
            caution_snapshots: AtomicU64::new(0),
            vehicles: AtomicU64::new(0),
            timings: RwLock::new(GenerationTimer::default()),
        }
    }

    /// Record one generated snapshot and how long it took
    pub fn record_snapshot(&self, feed: &LiveFeed, took: Duration) {
        self.snapshots.fetch_add(1, Ordering::Relaxed);
        self.vehicles.fetch_add(feed.vehicles.len() as u64, Ordering::Relaxed);
        if feed.flag_state == FlagState::Caution {
            self.caution_snapshots.fetch_add(1, Ordering::Relaxed);
        }
        self.timings.write().record(took);
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            total_snapshots: self.snapshots.load(Ordering::Relaxed),
            caution_snapshots: self.caution_snapshots.load(Ordering::Relaxed),
            total_vehicles: self.vehicles.load(Ordering::Relaxed),
            generation: self.timings.read().stats(),
        }
    }

    pub fn reset(&self) {
        self.snapshots.store(0, Ordering::Relaxed);
        self.caution_snapshots.store(0, Ordering::Relaxed);
        self.vehicles.store(0, Ordering::Relaxed);
        *self.timings.write() = GenerationTimer::default();
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of engine counters, served at `/admin/stats`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineStats {
    pub total_snapshots: u64,
    pub caution_snapshots: u64,
    pub total_vehicles: u64,
    pub generation: GenerationStats,
}

impl EngineStats {
    /// Share of snapshots generated under caution
    pub fn caution_rate(&self) -> f64 {
        if self.total_snapshots == 0 {
            0.0
        } else {
            self.caution_snapshots as f64 / self.total_snapshots as f64
        }
    }
}

#[derive(Debug, Default)]
struct GenerationTimer {
    count: u64,
    total: Duration,
    min: Option<Duration>,
    max: Option<Duration>,
}

impl GenerationTimer {
    fn record(&mut self, took: Duration) {
        self.count += 1;
        self.total += took;
        self.min = Some(self.min.map_or(took, |m| m.min(took)));
        self.max = Some(self.max.map_or(took, |m| m.max(took)));
    }

    fn stats(&self) -> GenerationStats {
        if self.count == 0 {
            return GenerationStats::default();
        }

        GenerationStats {
            count: self.count,
            mean_us: self.total.as_secs_f64() * 1_000_000.0 / self.count as f64,
            min_us: self.min.map_or(0.0, |d| d.as_secs_f64() * 1_000_000.0),
            max_us: self.max.map_or(0.0, |d| d.as_secs_f64() * 1_000_000.0),
        }
    }
}

/// Snapshot generation time in microseconds
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationStats {
    pub count: u64,
    pub mean_us: f64,
    pub min_us: f64,
    pub max_us: f64,
}
