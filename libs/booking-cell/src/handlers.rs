use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};

use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{
    BookingError, BookingStage, BookingStatusResponse, ConfirmBookingRequest, SelectSlotRequest,
};
use crate::services::confirmation::BookingFlowService;
use crate::BookingState;

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::NothingPending => AppError::NotFound(err.to_string()),
            BookingError::SubmissionInFlight => AppError::Conflict(err.to_string()),
            BookingError::StaleSelection => AppError::Validation(err.to_string()),
            BookingError::Backend(e) => e.into(),
        }
    }
}

#[axum::debug_handler]
pub async fn select_slot(
    State(state): State<Arc<BookingState>>,
    Extension(user): Extension<User>,
    Json(request): Json<SelectSlotRequest>,
) -> Result<Json<BookingStatusResponse>, AppError> {
    let service = BookingFlowService::new(&state.config, state.store.clone());
    let pending = service.select_slot(&user.id, request).await?;

    Ok(Json(BookingStatusResponse {
        stage: BookingStage::PendingConfirmation,
        pending: Some(pending),
    }))
}

#[axum::debug_handler]
pub async fn confirm_booking(
    State(state): State<Arc<BookingState>>,
    Extension(user): Extension<User>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<ConfirmBookingRequest>,
) -> Result<Json<Value>, AppError> {
    let service = BookingFlowService::new(&state.config, state.store.clone());
    let appointment = service.confirm(&user.id, request, auth.token()).await?;

    Ok(Json(json!({
        "stage": "booked",
        "appointment": appointment
    })))
}

#[axum::debug_handler]
pub async fn cancel_booking(
    State(state): State<Arc<BookingState>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let service = BookingFlowService::new(&state.config, state.store.clone());
    service.cancel(&user.id).await?;

    Ok(Json(json!({ "stage": "browsing" })))
}

#[axum::debug_handler]
pub async fn get_booking_status(
    State(state): State<Arc<BookingState>>,
    Extension(user): Extension<User>,
) -> Result<Json<BookingStatusResponse>, AppError> {
    let service = BookingFlowService::new(&state.config, state.store.clone());
    Ok(Json(service.status(&user.id).await))
}
