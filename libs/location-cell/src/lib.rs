pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::*;
pub use router::*;

use std::sync::Arc;

use shared_config::AppConfig;

use crate::services::position::SessionPositionCache;

/// Shared state for the location cell: configuration plus the per-user
/// cache of last reported device positions.
pub struct LocationState {
    pub config: Arc<AppConfig>,
    pub positions: SessionPositionCache,
}

impl LocationState {
    pub fn new(config: Arc<AppConfig>) -> Self {
        let positions = SessionPositionCache::new(config.position_ttl_minutes);
        Self { config, positions }
    }
}
