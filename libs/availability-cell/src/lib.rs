pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::*;
pub use router::*;

use std::sync::Arc;

use shared_config::AppConfig;

use crate::services::board::SlotBoardCache;

/// Shared state for the availability cell: the app configuration plus the
/// generation-tagged board cache that discards superseded fetches.
pub struct AvailabilityState {
    pub config: Arc<AppConfig>,
    pub boards: SlotBoardCache,
}

impl AvailabilityState {
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self {
            config,
            boards: SlotBoardCache::new(),
        }
    }
}
