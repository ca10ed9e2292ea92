use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::models::{PatientPreferences, UpdatePreferencesRequest};

/// In-memory per-process preference store keyed by patient id.
pub struct PreferenceStore {
    inner: RwLock<HashMap<String, PatientPreferences>>,
}

impl PreferenceStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the stored preferences, or the empty default for patients
    /// who never saved any.
    pub async fn get(&self, patient_id: &str) -> PatientPreferences {
        let preferences = self.inner.read().await;
        preferences.get(patient_id).cloned().unwrap_or_default()
    }

    /// Replaces the whole record: last write wins.
    pub async fn put(
        &self,
        patient_id: &str,
        request: UpdatePreferencesRequest,
    ) -> PatientPreferences {
        let record = PatientPreferences {
            preferred_location_id: request.preferred_location_id,
            preferred_doctor_id: request.preferred_doctor_id,
            updated_at: Some(Utc::now()),
        };

        let mut preferences = self.inner.write().await;
        preferences.insert(patient_id.to_string(), record.clone());
        debug!("Stored preferences for patient {}", patient_id);

        record
    }
}

impl Default for PreferenceStore {
    fn default() -> Self {
        Self::new()
    }
}
