use std::sync::Arc;

use axum::{
    extract::{Extension, Query, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};

use shared_models::auth::User;
use shared_models::error::AppError;
use shared_utils::jwt::validate_token;

use crate::models::{GeoPoint, NearestLocation, NearestQuery, RecordPositionRequest};
use crate::services::catalog::LocationService;
use crate::services::geo;
use crate::LocationState;

#[axum::debug_handler]
pub async fn list_locations(
    State(state): State<Arc<LocationState>>,
) -> Result<Json<Value>, AppError> {
    let service = LocationService::new(&state.config);
    let locations = service.list_locations().await?;

    Ok(Json(json!({
        "locations": locations,
        "total": locations.len()
    })))
}

/// Records the caller's device position. The client reports it whenever
/// the browser grants geolocation; the cache fills in for later requests
/// that arrive without coordinates.
#[axum::debug_handler]
pub async fn record_position(
    State(state): State<Arc<LocationState>>,
    Extension(user): Extension<User>,
    Json(request): Json<RecordPositionRequest>,
) -> Result<Json<Value>, AppError> {
    if request.latitude.abs() > 90.0 || request.longitude.abs() > 180.0 {
        return Err(AppError::Validation(
            "Coordinates out of range".to_string(),
        ));
    }

    let point = GeoPoint {
        latitude: request.latitude,
        longitude: request.longitude,
    };
    state.positions.record(&user.id, point).await;

    Ok(Json(json!({ "recorded": true })))
}

/// Suggests the nearest clinic site. Advisory only: the result pre-fills a
/// location filter on the client and never constrains what can be booked.
#[axum::debug_handler]
pub async fn nearest_location(
    State(state): State<Arc<LocationState>>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    Query(query): Query<NearestQuery>,
) -> Result<Json<NearestLocation>, AppError> {
    let origin = resolve_origin(&state, bearer.as_ref(), &query).await?;

    let service = LocationService::new(&state.config);
    let locations = service.list_locations().await?;

    geo::nearest(origin, &locations)
        .map(Json)
        .ok_or_else(|| {
            AppError::NotFound("No location with usable coordinates".to_string())
        })
}

/// Explicit query coordinates win; otherwise fall back to the caller's
/// cached session position. Without either the suggestion is simply
/// unavailable - never an error that blocks other functionality.
async fn resolve_origin(
    state: &LocationState,
    bearer: Option<&TypedHeader<Authorization<Bearer>>>,
    query: &NearestQuery,
) -> Result<GeoPoint, AppError> {
    match (query.lat, query.lng) {
        (Some(latitude), Some(longitude)) => {
            if latitude.abs() > 90.0 || longitude.abs() > 180.0 {
                return Err(AppError::Validation("Coordinates out of range".to_string()));
            }
            Ok(GeoPoint {
                latitude,
                longitude,
            })
        }
        (Some(_), None) | (None, Some(_)) => Err(AppError::Validation(
            "Both lat and lng are required".to_string(),
        )),
        (None, None) => {
            if let Some(TypedHeader(auth)) = bearer {
                if let Ok(user) = validate_token(auth.token(), &state.config.jwt_secret) {
                    if let Some(point) = state.positions.lookup(&user.id).await {
                        return Ok(point);
                    }
                }
            }
            Err(AppError::NotFound("Position unavailable".to_string()))
        }
    }
}
