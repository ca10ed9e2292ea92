use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use location_cell::router::location_routes;
use location_cell::LocationState;
use shared_utils::test_utils::{JwtTestUtils, MockBackendResponses, TestConfig, TestUser};

fn create_test_app(backend_url: &str) -> (Router, TestConfig) {
    let test_config = TestConfig::with_backend_url(backend_url);
    let app = location_routes(Arc::new(LocationState::new(test_config.to_arc())));
    (app, test_config)
}

async fn mount_catalogue(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/sedi"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(MockBackendResponses::locations_response()),
        )
        .mount(mock_server)
        .await;
}

async fn body_json(response: axum::http::Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn catalogue_is_listed_with_english_field_names() {
    let mock_server = MockServer::start().await;
    mount_catalogue(&mock_server).await;

    let (app, _) = create_test_app(&mock_server.uri());

    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["total"], 3);
    assert_eq!(body["locations"][0]["name"], "Clinica Centro");
    assert_eq!(body["locations"][0]["city"], "Piacenza");
}

#[tokio::test]
async fn nearest_with_explicit_coordinates_picks_the_closest_site() {
    let mock_server = MockServer::start().await;
    mount_catalogue(&mock_server).await;

    let (app, _) = create_test_app(&mock_server.uri());

    // Close to Clinica Centro (45.05, 9.70); Clinica Nord uses comma
    // decimals and the third site has no coordinates at all.
    let request = Request::builder()
        .uri("/nearest?lat=45.05&lng=9.70")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["location"]["id"], "sede-1");
    assert_eq!(body["distance_km"], 0.0);
}

#[tokio::test]
async fn nearest_parses_comma_decimal_coordinates() {
    let mock_server = MockServer::start().await;
    mount_catalogue(&mock_server).await;

    let (app, _) = create_test_app(&mock_server.uri());

    // Observer in Milano, where Clinica Nord (45,46 / 9,19) is closest.
    let request = Request::builder()
        .uri("/nearest?lat=45.46&lng=9.19")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["location"]["id"], "sede-2");
}

#[tokio::test]
async fn partial_coordinates_are_a_validation_error() {
    let mock_server = MockServer::start().await;
    let (app, _) = create_test_app(&mock_server.uri());

    let request = Request::builder()
        .uri("/nearest?lat=45.0")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn nearest_without_position_reports_position_unavailable() {
    let mock_server = MockServer::start().await;
    mount_catalogue(&mock_server).await;

    let (app, _) = create_test_app(&mock_server.uri());

    let request = Request::builder()
        .uri("/nearest")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Position unavailable");
}

#[tokio::test]
async fn recorded_position_backs_nearest_without_coordinates() {
    let mock_server = MockServer::start().await;
    mount_catalogue(&mock_server).await;

    let (app, test_config) = create_test_app(&mock_server.uri());

    let user = TestUser::patient("pat@example.com");
    let token = JwtTestUtils::create_test_token(&user, &test_config.jwt_secret, Some(24));

    let record = Request::builder()
        .method("PUT")
        .uri("/position")
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "latitude": 45.05, "longitude": 9.70 }).to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(record).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let request = Request::builder()
        .uri("/nearest")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["location"]["id"], "sede-1");
}

#[tokio::test]
async fn recording_a_position_requires_authentication() {
    let mock_server = MockServer::start().await;
    let (app, _) = create_test_app(&mock_server.uri());

    let request = Request::builder()
        .method("PUT")
        .uri("/position")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "latitude": 45.0, "longitude": 9.0 }).to_string(),
        ))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn out_of_range_position_is_rejected() {
    let mock_server = MockServer::start().await;
    let (app, test_config) = create_test_app(&mock_server.uri());

    let user = TestUser::patient("pat@example.com");
    let token = JwtTestUtils::create_test_token(&user, &test_config.jwt_secret, Some(24));

    let request = Request::builder()
        .method("PUT")
        .uri("/position")
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "latitude": 95.0, "longitude": 9.0 }).to_string(),
        ))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn expired_cached_position_counts_as_unavailable() {
    let mock_server = MockServer::start().await;
    mount_catalogue(&mock_server).await;

    let mut test_config = TestConfig::with_backend_url(&mock_server.uri());
    test_config.position_ttl_minutes = 0; // expire immediately
    let app = location_routes(Arc::new(LocationState::new(test_config.to_arc())));

    let user = TestUser::patient("pat@example.com");
    let token = JwtTestUtils::create_test_token(&user, &test_config.jwt_secret, Some(24));

    let record = Request::builder()
        .method("PUT")
        .uri("/position")
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "latitude": 45.05, "longitude": 9.70 }).to_string(),
        ))
        .unwrap();
    assert_eq!(
        app.clone().oneshot(record).await.unwrap().status(),
        StatusCode::OK
    );

    tokio::time::sleep(std::time::Duration::from_millis(10)).await;

    let request = Request::builder()
        .uri("/nearest")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
