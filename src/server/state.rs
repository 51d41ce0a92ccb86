//! Server state management

use std::sync::Arc;

use super::shutdown::ShutdownState;
use crate::config::FeedConfig;
use crate::engine::RaceEngine;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RaceEngine>,
    pub config: Arc<FeedConfig>,
    pub shutdown: Arc<ShutdownState>,
}

impl AppState {
    pub fn new(config: FeedConfig) -> Self {
        Self {
            engine: Arc::new(RaceEngine::new(config.generator.clone())),
            shutdown: Arc::new(ShutdownState::new(config.server.drain_timeout())),
            config: Arc::new(config),
        }
    }
}
