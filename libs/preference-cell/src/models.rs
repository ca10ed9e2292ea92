use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Patient UI preferences. Last write wins; no other invariant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientPreferences {
    pub preferred_location_id: Option<String>,
    pub preferred_doctor_id: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePreferencesRequest {
    pub preferred_location_id: Option<String>,
    pub preferred_doctor_id: Option<String>,
}
