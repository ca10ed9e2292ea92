use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};

use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_utils::jwt::validate_token;

use crate::models::{SlotBoard, SlotsByDayQuery, TimeFilter, UpcomingSlotsQuery};
use crate::services::fetch::AvailabilityService;
use crate::services::filter::{build_board, filter_slots};
use crate::AvailabilityState;

/// Browsing is public, but the board cache still needs a stable key to
/// detect superseded fetches: the authenticated user when a valid bearer
/// token is present, otherwise an opaque client session header. Anonymous
/// callers without either simply skip the cache.
fn session_key(
    config: &AppConfig,
    bearer: Option<&TypedHeader<Authorization<Bearer>>>,
    headers: &HeaderMap,
) -> Option<String> {
    if let Some(TypedHeader(auth)) = bearer {
        if let Ok(user) = validate_token(auth.token(), &config.jwt_secret) {
            return Some(user.id);
        }
    }

    headers
        .get("x-session-id")
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(|value| value.to_string())
}

#[axum::debug_handler]
pub async fn get_upcoming_slots(
    State(state): State<Arc<AvailabilityState>>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    headers: HeaderMap,
    Query(query): Query<UpcomingSlotsQuery>,
) -> Result<Json<SlotBoard>, AppError> {
    if let (Some(from), Some(to)) = (query.from_date, query.to_date) {
        if from > to {
            return Err(AppError::Validation(
                "From date must not be after to date".to_string(),
            ));
        }
    }

    let time_filter =
        TimeFilter::from_query(query.from_hour, query.to_hour, query.period.as_deref())
            .map_err(|e| AppError::Validation(e.to_string()))?;

    let key = session_key(&state.config, bearer.as_ref(), &headers);
    let generation = match &key {
        Some(k) => Some(state.boards.begin(k).await),
        None => None,
    };

    let service = AvailabilityService::new(&state.config);
    let slots = service.upcoming_slots(&query).await?;

    let board = build_board(filter_slots(slots, query.doctor_id.as_deref(), time_filter));

    if let (Some(k), Some(g)) = (key, generation) {
        state.boards.commit(&k, g, board.clone()).await;
    }

    Ok(Json(board))
}

#[axum::debug_handler]
pub async fn get_slots_by_day(
    State(state): State<Arc<AvailabilityState>>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    headers: HeaderMap,
    Query(query): Query<SlotsByDayQuery>,
) -> Result<Json<SlotBoard>, AppError> {
    let time_filter =
        TimeFilter::from_query(query.from_hour, query.to_hour, query.period.as_deref())
            .map_err(|e| AppError::Validation(e.to_string()))?;

    let key = session_key(&state.config, bearer.as_ref(), &headers);
    let generation = match &key {
        Some(k) => Some(state.boards.begin(k).await),
        None => None,
    };

    let service = AvailabilityService::new(&state.config);
    let slots = service.slots_by_day(&query).await?;

    let board = build_board(filter_slots(slots, query.doctor_id.as_deref(), time_filter));

    if let (Some(k), Some(g)) = (key, generation) {
        state.boards.commit(&k, g, board.clone()).await;
    }

    Ok(Json(board))
}

/// Returns the last committed board for the caller's session, so a client
/// can resume where it left off without refetching.
#[axum::debug_handler]
pub async fn get_latest_board(
    State(state): State<Arc<AvailabilityState>>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    headers: HeaderMap,
) -> Result<Json<SlotBoard>, AppError> {
    let key = session_key(&state.config, bearer.as_ref(), &headers)
        .ok_or_else(|| AppError::NotFound("No slot board for this session".to_string()))?;

    state
        .boards
        .latest(&key)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No slot board for this session".to_string()))
}
