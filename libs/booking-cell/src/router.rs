use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use shared_utils::extractor::auth_middleware;

use crate::handlers;
use crate::BookingState;

/// Booking routes. Everything requires authentication: an unauthenticated
/// slot selection is rejected with 401 before any state transition (the
/// client turns that into a login redirect).
pub fn booking_routes(state: Arc<BookingState>) -> Router {
    Router::new()
        .route("/pending", post(handlers::select_slot))
        .route("/pending", get(handlers::get_booking_status))
        .route("/pending", delete(handlers::cancel_booking))
        .route("/confirm", post(handlers::confirm_booking))
        .layer(middleware::from_fn_with_state(
            state.config.clone(),
            auth_middleware,
        ))
        .with_state(state)
}
