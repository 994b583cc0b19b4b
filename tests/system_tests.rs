//! Integration tests for reports, system status and response headers.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use workshopwise::config::Config;

async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.security.argon2_memory_cost_kib = 64;
    config.security.argon2_time_cost = 1;

    let state = workshopwise::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    workshopwise::api::router(state).await
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn post_json(app: &Router, uri: &str, body: Value) -> Value {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_system_status() {
    let app = spawn_app().await;

    let (status, body) = get_json(&app, "/api/system/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["database"], "ok");
    assert!(body["uptime"].is_u64());
}

#[tokio::test]
async fn test_security_headers_and_request_id() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/system/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
    assert!(headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn test_metrics_disabled_returns_404() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_overview_on_empty_database() {
    let app = spawn_app().await;

    let (status, body) = get_json(&app, "/api/reports/overview").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalUsers"], 0);
    assert_eq!(body["totalWorkshops"], 0);
    assert_eq!(body["totalRegistrations"], 0);
    assert_eq!(body["availableSeats"], 0);
    assert_eq!(body["usersByRole"]["admin"], 0);
    assert_eq!(body["registrationsByStatus"]["cancelled"], 0);
}

#[tokio::test]
async fn test_overview_counts() {
    let app = spawn_app().await;

    let user = post_json(
        &app,
        "/api/users",
        json!({
            "username": "admin",
            "password": "admin123",
            "email": "admin@workshopwise.com",
            "name": "Admin",
            "role": "admin"
        }),
    )
    .await;

    let workshop = post_json(
        &app,
        "/api/workshops",
        json!({
            "title": "Data Engineering Bootcamp",
            "company": "DataWorks",
            "date": "2025-05-20",
            "time": "11:00 AM",
            "mode": "online",
            "price": "999.99",
            "seats": 20,
            "image": "/images/data.png"
        }),
    )
    .await;

    post_json(
        &app,
        "/api/registrations",
        json!({ "userId": user["id"], "workshopId": workshop["id"] }),
    )
    .await;

    let (_, body) = get_json(&app, "/api/reports/overview").await;
    assert_eq!(body["totalUsers"], 1);
    assert_eq!(body["usersByRole"]["admin"], 1);
    assert_eq!(body["totalWorkshops"], 1);
    assert_eq!(body["activeWorkshops"], 1);
    assert_eq!(body["totalRegistrations"], 1);
    assert_eq!(body["availableSeats"], 19);
    assert_eq!(body["registrationsByStatus"]["confirmed"], 1);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/does-not-exist")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
