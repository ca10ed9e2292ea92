use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, put},
    Router,
};

use shared_utils::extractor::auth_middleware;

use crate::handlers;
use crate::PreferenceState;

pub fn preference_routes(state: Arc<PreferenceState>) -> Router {
    Router::new()
        .route("/", get(handlers::get_preferences))
        .route("/", put(handlers::update_preferences))
        .layer(middleware::from_fn_with_state(
            state.config.clone(),
            auth_middleware,
        ))
        .with_state(state)
}
