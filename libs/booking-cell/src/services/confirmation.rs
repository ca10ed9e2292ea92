use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use shared_backend::BackendClient;
use shared_config::AppConfig;

use crate::models::{
    BookingError, BookingStage, BookingStatusResponse, ConfirmBookingRequest, PendingBooking,
    SelectSlotRequest,
};

/// Per-patient confirmation sessions. A session exists only between slot
/// selection and confirm/cancel; `submitting` is the mutual-exclusion flag
/// that keeps at most one submission in flight per patient.
pub struct BookingFlowStore {
    sessions: RwLock<HashMap<String, BookingSession>>,
}

struct BookingSession {
    pending: PendingBooking,
    submitting: bool,
}

impl BookingFlowStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for BookingFlowStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Releases a claimed submission if the confirm future is dropped before
/// its bookkeeping runs (client disconnects abort the handler mid-await).
/// Without this the session would stay in Submitting forever.
struct SubmissionClaim {
    store: Arc<BookingFlowStore>,
    patient_id: String,
    armed: bool,
}

impl SubmissionClaim {
    fn new(store: Arc<BookingFlowStore>, patient_id: &str) -> Self {
        Self {
            store,
            patient_id: patient_id.to_string(),
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for SubmissionClaim {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let store = self.store.clone();
        let patient_id = std::mem::take(&mut self.patient_id);
        warn!(
            "Confirm for patient {} dropped mid-submission, releasing the in-flight flag",
            patient_id
        );
        tokio::spawn(async move {
            let mut sessions = store.sessions.write().await;
            if let Some(session) = sessions.get_mut(&patient_id) {
                session.submitting = false;
            }
        });
    }
}

pub struct BookingFlowService {
    backend: BackendClient,
    store: Arc<BookingFlowStore>,
}

impl BookingFlowService {
    pub fn new(config: &AppConfig, store: Arc<BookingFlowStore>) -> Self {
        Self {
            backend: BackendClient::new(config),
            store,
        }
    }

    /// Browsing -> PendingConfirmation. Re-selecting replaces the previous
    /// pending slot, but never while a submission is in flight.
    pub async fn select_slot(
        &self,
        patient_id: &str,
        request: SelectSlotRequest,
    ) -> Result<PendingBooking, BookingError> {
        let mut sessions = self.store.sessions.write().await;

        if sessions.get(patient_id).is_some_and(|s| s.submitting) {
            return Err(BookingError::SubmissionInFlight);
        }

        let pending = PendingBooking {
            slot: request.slot,
            service_id: request.service_id,
            doctor_filter: request.doctor_filter,
            selected_at: Utc::now(),
        };

        info!(
            "Patient {} selected slot {} {} with doctor {}",
            patient_id, pending.slot.date, pending.slot.start_time, pending.slot.doctor_id
        );

        sessions.insert(
            patient_id.to_string(),
            BookingSession {
                pending: pending.clone(),
                submitting: false,
            },
        );

        Ok(pending)
    }

    /// PendingConfirmation -> Submitting -> Booked, or back to
    /// PendingConfirmation on failure so the patient can retry or cancel.
    pub async fn confirm(
        &self,
        patient_id: &str,
        request: ConfirmBookingRequest,
        auth_token: &str,
    ) -> Result<Value, BookingError> {
        // Claim the submission under the lock; the claim is what makes a
        // second confirm observe SubmissionInFlight instead of racing.
        let pending = {
            let mut sessions = self.store.sessions.write().await;
            let session = sessions
                .get_mut(patient_id)
                .ok_or(BookingError::NothingPending)?;

            if session.submitting {
                return Err(BookingError::SubmissionInFlight);
            }

            if let Some(doctor_filter) = &session.pending.doctor_filter {
                if *doctor_filter != session.pending.slot.doctor_id {
                    warn!(
                        "Patient {} pending slot doctor {} no longer matches filter {}",
                        patient_id, session.pending.slot.doctor_id, doctor_filter
                    );
                    return Err(BookingError::StaleSelection);
                }
            }

            session.submitting = true;
            session.pending.clone()
        };
        let claim = SubmissionClaim::new(self.store.clone(), patient_id);

        let appointment_type = request
            .appointment_type
            .unwrap_or_else(|| "visita".to_string());

        let params: Vec<(&str, String)> = vec![
            ("pazienteId", patient_id.to_string()),
            ("medicoId", pending.slot.doctor_id.clone()),
            ("prestazioneId", pending.service_id.clone()),
            ("data", pending.slot.date.to_string()),
            ("oraInizio", pending.slot.start_time.clone()),
            ("tipoAppuntamento", appointment_type),
        ];

        let result: Result<Value, _> = self
            .backend
            .post("/appuntamenti/create", &params, Some(auth_token), None)
            .await;

        let mut sessions = self.store.sessions.write().await;
        claim.disarm();
        match result {
            Ok(appointment) => {
                sessions.remove(patient_id);
                info!("Patient {} booked slot with doctor {}", patient_id, pending.slot.doctor_id);
                Ok(appointment)
            }
            Err(e) => {
                // Recoverable: release the in-flight flag and keep the
                // selection so the patient may retry or cancel.
                if let Some(session) = sessions.get_mut(patient_id) {
                    session.submitting = false;
                }
                warn!("Booking submission for patient {} failed: {}", patient_id, e);
                Err(BookingError::Backend(e))
            }
        }
    }

    /// PendingConfirmation -> Browsing. Not allowed mid-submission.
    pub async fn cancel(&self, patient_id: &str) -> Result<(), BookingError> {
        let mut sessions = self.store.sessions.write().await;

        match sessions.get(patient_id) {
            None => Err(BookingError::NothingPending),
            Some(session) if session.submitting => Err(BookingError::SubmissionInFlight),
            Some(_) => {
                sessions.remove(patient_id);
                debug!("Patient {} cancelled pending booking", patient_id);
                Ok(())
            }
        }
    }

    pub async fn status(&self, patient_id: &str) -> BookingStatusResponse {
        let sessions = self.store.sessions.read().await;

        match sessions.get(patient_id) {
            None => BookingStatusResponse {
                stage: BookingStage::Browsing,
                pending: None,
            },
            Some(session) => BookingStatusResponse {
                stage: if session.submitting {
                    BookingStage::Submitting
                } else {
                    BookingStage::PendingConfirmation
                },
                pending: Some(session.pending.clone()),
            },
        }
    }
}
