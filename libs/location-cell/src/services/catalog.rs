use tracing::debug;

use shared_backend::{BackendClient, BackendError};
use shared_config::AppConfig;

use crate::models::Location;

pub struct LocationService {
    backend: BackendClient,
}

impl LocationService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            backend: BackendClient::new(config),
        }
    }

    /// Fetches the clinic site catalogue from the backend.
    pub async fn list_locations(&self) -> Result<Vec<Location>, BackendError> {
        debug!("Fetching location catalogue");
        self.backend.get("/sedi", &[], None).await
    }
}
