use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use availability_cell::{router::slot_routes, AvailabilityState};
use booking_cell::{router::booking_routes, BookingState};
use location_cell::{router::location_routes, LocationState};
use preference_cell::{router::preference_routes, PreferenceState};
use shared_config::AppConfig;

pub fn create_router(config: Arc<AppConfig>) -> Router {
    let availability = Arc::new(AvailabilityState::new(config.clone()));
    let locations = Arc::new(LocationState::new(config.clone()));
    let bookings = Arc::new(BookingState::new(config.clone()));
    let preferences = Arc::new(PreferenceState::new(config));

    Router::new()
        .route("/", get(|| async { "FlixBook booking gateway is running!" }))
        .nest("/slots", slot_routes(availability))
        .nest("/locations", location_routes(locations))
        .nest("/bookings", booking_routes(bookings))
        .nest("/preferences", preference_routes(preferences))
}
