pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::*;
pub use router::*;

use std::sync::Arc;

use shared_config::AppConfig;

use crate::services::confirmation::BookingFlowStore;

/// Shared state for the booking cell: configuration plus the per-patient
/// confirmation sessions.
pub struct BookingState {
    pub config: Arc<AppConfig>,
    pub store: Arc<BookingFlowStore>,
}

impl BookingState {
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self {
            config,
            store: Arc::new(BookingFlowStore::new()),
        }
    }
}
