use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    Json,
};

use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{PatientPreferences, UpdatePreferencesRequest};
use crate::PreferenceState;

#[axum::debug_handler]
pub async fn get_preferences(
    State(state): State<Arc<PreferenceState>>,
    Extension(user): Extension<User>,
) -> Result<Json<PatientPreferences>, AppError> {
    Ok(Json(state.store.get(&user.id).await))
}

#[axum::debug_handler]
pub async fn update_preferences(
    State(state): State<Arc<PreferenceState>>,
    Extension(user): Extension<User>,
    Json(request): Json<UpdatePreferencesRequest>,
) -> Result<Json<PatientPreferences>, AppError> {
    Ok(Json(state.store.put(&user.id, request).await))
}
