use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, put},
    Router,
};

use shared_utils::extractor::auth_middleware;

use crate::handlers;
use crate::LocationState;

pub fn location_routes(state: Arc<LocationState>) -> Router {
    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/", get(handlers::list_locations))
        .route("/nearest", get(handlers::nearest_location));

    // Protected routes (authentication required)
    let protected_routes = Router::new()
        .route("/position", put(handlers::record_position))
        .layer(middleware::from_fn_with_state(
            state.config.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
