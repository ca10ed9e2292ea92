use std::sync::Arc;

use axum::{routing::get, Router};

use crate::handlers;
use crate::AvailabilityState;

/// Slot browsing routes. All public: looking at availability never
/// requires a login, only booking does.
pub fn slot_routes(state: Arc<AvailabilityState>) -> Router {
    Router::new()
        .route("/upcoming", get(handlers::get_upcoming_slots))
        .route("/by-day", get(handlers::get_slots_by_day))
        .route("/latest", get(handlers::get_latest_board))
        .with_state(state)
}
