use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use availability_cell::router::slot_routes;
use availability_cell::AvailabilityState;
use shared_utils::test_utils::{JwtTestUtils, MockBackendResponses, TestConfig, TestUser};

fn create_test_app(backend_url: &str) -> Router {
    let config = TestConfig::with_backend_url(backend_url).to_arc();
    slot_routes(Arc::new(AvailabilityState::new(config)))
}

async fn body_json(response: axum::http::Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn upcoming_slots_are_filtered_sorted_and_split() {
    let mock_server = MockServer::start().await;

    // Unsorted response with a second doctor and one unusable start time.
    Mock::given(method("GET"))
        .and(path("/slots/prossimi-disponibili"))
        .and(query_param("prestazioneId", "svc-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockBackendResponses::slot_response("2026-09-02", "10:30", "doc-1"),
            MockBackendResponses::slot_response("2026-09-01", "15:00", "doc-1"),
            MockBackendResponses::slot_response("2026-09-01", "09:00", "doc-1"),
            MockBackendResponses::slot_response("2026-09-01", "09:30", "doc-2"),
            MockBackendResponses::slot_response("2026-09-01", "garbage", "doc-1"),
        ])))
        .mount(&mock_server)
        .await;

    let app = create_test_app(&mock_server.uri());

    let request = Request::builder()
        .uri("/upcoming?service_id=svc-1&doctor_id=doc-1")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let board = body_json(response).await;
    assert_eq!(board["total"], 3);
    assert_eq!(board["left"][0]["start_time"], "09:00");
    assert_eq!(board["left"][1]["start_time"], "15:00");
    assert_eq!(board["right"][0]["start_time"], "10:30");
    assert_eq!(board["right"][0]["date"], "2026-09-02");
}

#[tokio::test]
async fn invalid_hour_range_is_rejected_before_any_backend_call() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slots/prossimi-disponibili"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let app = create_test_app(&mock_server.uri());

    let request = Request::builder()
        .uri("/upcoming?service_id=svc-1&from_hour=14&to_hour=9")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn inverted_date_range_is_rejected() {
    let mock_server = MockServer::start().await;
    let app = create_test_app(&mock_server.uri());

    let request = Request::builder()
        .uri("/upcoming?service_id=svc-1&from_date=2026-09-10&to_date=2026-09-01")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_period_is_rejected() {
    let mock_server = MockServer::start().await;
    let app = create_test_app(&mock_server.uri());

    let request = Request::builder()
        .uri("/upcoming?service_id=svc-1&period=evening")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn by_day_requires_a_date() {
    let mock_server = MockServer::start().await;
    let app = create_test_app(&mock_server.uri());

    let request = Request::builder()
        .uri("/by-day?service_id=svc-1")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn by_day_passes_day_and_filters_hours() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slots/available-by-day"))
        .and(query_param("prestazioneId", "svc-1"))
        .and(query_param("data", "2026-09-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockBackendResponses::slot_response("2026-09-01", "09:00", "doc-1"),
            MockBackendResponses::slot_response("2026-09-01", "14:00", "doc-1"),
        ])))
        .mount(&mock_server)
        .await;

    let app = create_test_app(&mock_server.uri());

    let request = Request::builder()
        .uri("/by-day?service_id=svc-1&date=2026-09-01&period=afternoon")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let board = body_json(response).await;
    assert_eq!(board["total"], 1);
    assert_eq!(board["left"][0]["start_time"], "14:00");
}

#[tokio::test]
async fn backend_rejection_is_surfaced_verbatim() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slots/prossimi-disponibili"))
        .respond_with(
            ResponseTemplate::new(422)
                .set_body_json(MockBackendResponses::error_response("prestazione sconosciuta")),
        )
        .mount(&mock_server)
        .await;

    let app = create_test_app(&mock_server.uri());

    let request = Request::builder()
        .uri("/upcoming?service_id=svc-unknown")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    assert_eq!(body["error"], "prestazione sconosciuta");
}

#[tokio::test]
async fn unreachable_backend_maps_to_bad_gateway() {
    // Nothing listens on this port.
    let app = create_test_app("http://127.0.0.1:9");

    let request = Request::builder()
        .uri("/upcoming?service_id=svc-1")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn latest_board_is_kept_per_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slots/prossimi-disponibili"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockBackendResponses::slot_response("2026-09-01", "09:00", "doc-1"),
        ])))
        .mount(&mock_server)
        .await;

    let app = create_test_app(&mock_server.uri());

    let fetch = Request::builder()
        .uri("/upcoming?service_id=svc-1")
        .header("x-session-id", "session-42")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(fetch).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let latest = Request::builder()
        .uri("/latest")
        .header("x-session-id", "session-42")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(latest).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let board = body_json(response).await;
    assert_eq!(board["total"], 1);

    // A different session has no board.
    let other = Request::builder()
        .uri("/latest")
        .header("x-session-id", "session-43")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(other).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn latest_board_uses_the_authenticated_user_as_key() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slots/prossimi-disponibili"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockBackendResponses::upcoming_slots_response("doc-1"),
        ))
        .mount(&mock_server)
        .await;

    let test_config = TestConfig::with_backend_url(&mock_server.uri());
    let app = slot_routes(Arc::new(AvailabilityState::new(test_config.to_arc())));

    let user = TestUser::patient("pat@example.com");
    let token = JwtTestUtils::create_test_token(&user, &test_config.jwt_secret, Some(24));

    let fetch = Request::builder()
        .uri("/upcoming?service_id=svc-1")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    assert_eq!(
        app.clone().oneshot(fetch).await.unwrap().status(),
        StatusCode::OK
    );

    let latest = Request::builder()
        .uri("/latest")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(latest).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let board = body_json(response).await;
    assert_eq!(board["total"], 3);
}

#[tokio::test]
async fn anonymous_latest_board_is_not_found() {
    let mock_server = MockServer::start().await;
    let app = create_test_app(&mock_server.uri());

    let request = Request::builder().uri("/latest").body(Body::empty()).unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
