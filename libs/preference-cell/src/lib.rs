pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::*;
pub use router::*;

use std::sync::Arc;

use shared_config::AppConfig;

use crate::services::store::PreferenceStore;

/// Shared state for the preference cell. The store replaces what the web
/// client used to keep in browser storage, with an explicit read/write
/// contract instead of ambient key-value access.
pub struct PreferenceState {
    pub config: Arc<AppConfig>,
    pub store: PreferenceStore,
}

impl PreferenceState {
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self {
            config,
            store: PreferenceStore::new(),
        }
    }
}
