use tracing::debug;

use shared_backend::{BackendClient, BackendError};
use shared_config::AppConfig;

use crate::models::{Slot, SlotsByDayQuery, UpcomingSlotsQuery};

/// Default number of candidate slots requested from the backend. The
/// display cap trims afterwards, so over-fetching keeps the board full
/// even when the hour predicate discards most candidates.
const DEFAULT_FETCH_LIMIT: u32 = 100;

pub struct AvailabilityService {
    backend: BackendClient,
}

impl AvailabilityService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            backend: BackendClient::new(config),
        }
    }

    /// Queries the backend for the next available slots of a service,
    /// optionally restricted by doctor, date range, hour range and location.
    pub async fn upcoming_slots(
        &self,
        query: &UpcomingSlotsQuery,
    ) -> Result<Vec<Slot>, BackendError> {
        debug!("Fetching upcoming slots for service {}", query.service_id);

        let mut params: Vec<(&str, String)> =
            vec![("prestazioneId", query.service_id.clone())];

        if let Some(doctor_id) = &query.doctor_id {
            params.push(("medicoId", doctor_id.clone()));
        }
        if let Some(from_date) = query.from_date {
            params.push(("fromDate", from_date.to_string()));
        }
        if let Some(to_date) = query.to_date {
            params.push(("toDate", to_date.to_string()));
        }
        if let Some(from_hour) = query.from_hour {
            params.push(("fromHour", from_hour.to_string()));
        }
        if let Some(to_hour) = query.to_hour {
            params.push(("toHour", to_hour.to_string()));
        }
        if let Some(location_id) = &query.location_id {
            params.push(("sedeId", location_id.clone()));
        }
        params.push((
            "limit",
            query.limit.unwrap_or(DEFAULT_FETCH_LIMIT).to_string(),
        ));

        self.backend
            .get("/slots/prossimi-disponibili", &params, None)
            .await
    }

    /// Queries the backend for the slots of a single calendar day.
    pub async fn slots_by_day(&self, query: &SlotsByDayQuery) -> Result<Vec<Slot>, BackendError> {
        debug!(
            "Fetching slots for service {} on {}",
            query.service_id, query.date
        );

        let mut params: Vec<(&str, String)> = vec![
            ("prestazioneId", query.service_id.clone()),
            ("data", query.date.to_string()),
        ];

        if let Some(doctor_id) = &query.doctor_id {
            params.push(("medicoId", doctor_id.clone()));
        }
        if let Some(location_id) = &query.location_id {
            params.push(("sedeId", location_id.clone()));
        }

        self.backend
            .get("/slots/available-by-day", &params, None)
            .await
    }
}
