use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use availability_cell::models::Slot;
use shared_backend::BackendError;

/// The transient selection held between the user's click on a slot and the
/// confirmed submission. Destroyed on confirm or cancel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingBooking {
    pub slot: Slot,
    pub service_id: String,
    /// Doctor filter active when the slot was selected; re-checked right
    /// before submission to catch staleness between fetch and click.
    pub doctor_filter: Option<String>,
    pub selected_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStage {
    Browsing,
    PendingConfirmation,
    Submitting,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectSlotRequest {
    pub slot: Slot,
    pub service_id: String,
    pub doctor_filter: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfirmBookingRequest {
    /// tipoAppuntamento forwarded to the backend; defaults to a plain visit.
    pub appointment_type: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingStatusResponse {
    pub stage: BookingStage,
    pub pending: Option<PendingBooking>,
}

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("No pending booking for this patient")]
    NothingPending,

    #[error("A booking submission is already in flight")]
    SubmissionInFlight,

    #[error("Selected slot no longer matches the active doctor filter")]
    StaleSelection,

    #[error(transparent)]
    Backend(#[from] BackendError),
}
