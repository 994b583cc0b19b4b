//! Integration tests for seat reservation and the registration lifecycle.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use futures::future::join_all;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use workshopwise::config::Config;

async fn spawn_app() -> Router {
    let db_path = std::env::temp_dir().join(format!(
        "workshopwise-registration-test-{}.db",
        uuid::Uuid::new_v4()
    ));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());
    // Cheap hashing keeps user setup fast.
    config.security.argon2_memory_cost_kib = 64;
    config.security.argon2_time_cost = 1;

    let state = workshopwise::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    workshopwise::api::router(state).await
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn create_workshop(app: &Router, seats: i64, registration_mode: &str) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/api/workshops",
        Some(json!({
            "title": "Kubernetes in Production",
            "company": "CloudNine",
            "date": "2025-03-01",
            "time": "09:30 AM",
            "mode": "online",
            "price": 0,
            "seats": seats,
            "registrationMode": registration_mode,
            "image": "/images/k8s.png"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

async fn create_user(app: &Router, username: &str) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/api/users",
        Some(json!({
            "username": username,
            "password": "correct-horse",
            "email": format!("{username}@example.com"),
            "name": username,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_i64().unwrap()
}

async fn register(app: &Router, user_id: i64, workshop_id: i64) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        "/api/registrations",
        Some(json!({ "userId": user_id, "workshopId": workshop_id })),
    )
    .await
}

async fn set_status(app: &Router, id: i64, status: &str) -> (StatusCode, Value) {
    let uri = format!("/api/registrations/{id}/status");
    send(app, "PUT", &uri, Some(json!({ "status": status }))).await
}

async fn registered_seats(app: &Router, workshop_id: i64) -> i64 {
    let (_, workshop) = send(app, "GET", &format!("/api/workshops/{workshop_id}"), None).await;
    workshop["registeredSeats"].as_i64().unwrap()
}

#[tokio::test]
async fn test_concurrent_registrations_never_overbook() {
    let app = spawn_app().await;
    let workshop_id = create_workshop(&app, 30, "automated").await;

    let mut user_ids = Vec::new();
    for i in 0..31 {
        user_ids.push(create_user(&app, &format!("attendee{i}")).await);
    }

    let attempts = user_ids
        .iter()
        .map(|&user_id| register(&app, user_id, workshop_id));
    let results = join_all(attempts).await;

    let created = results
        .iter()
        .filter(|(status, _)| *status == StatusCode::CREATED)
        .count();
    let conflicts = results
        .iter()
        .filter(|(status, _)| *status == StatusCode::CONFLICT)
        .count();

    assert_eq!(created, 30);
    assert_eq!(conflicts, 1);
    assert_eq!(registered_seats(&app, workshop_id).await, 30);

    let (_, listed) = send(
        &app,
        "GET",
        &format!("/api/registrations/workshop/{workshop_id}"),
        None,
    )
    .await;
    assert_eq!(listed.as_array().unwrap().len(), 30);
}

#[tokio::test]
async fn test_automated_workshop_confirms_immediately() {
    let app = spawn_app().await;
    let workshop_id = create_workshop(&app, 5, "automated").await;
    let user_id = create_user(&app, "jane").await;

    let (status, registration) = register(&app, user_id, workshop_id).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(registration["status"], "confirmed");
    assert_eq!(registration["userId"], user_id);
    assert_eq!(registration["workshopId"], workshop_id);

    let id = registration["id"].as_i64().unwrap();
    let (status, fetched) = send(&app, "GET", &format!("/api/registrations/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, registration);

    let (_, mine) = send(
        &app,
        "GET",
        &format!("/api/registrations/user/{user_id}"),
        None,
    )
    .await;
    assert_eq!(mine.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_duplicate_registration_is_a_conflict() {
    let app = spawn_app().await;
    let workshop_id = create_workshop(&app, 5, "manual").await;
    let user_id = create_user(&app, "sam").await;

    let (status, first) = register(&app, user_id, workshop_id).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["status"], "pending");

    let (status, body) = register(&app, user_id, workshop_id).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let message = body["error"].as_str().unwrap();
    assert!(message.contains(&format!("registration {}", first["id"])));
    assert_eq!(registered_seats(&app, workshop_id).await, 1);
}

#[tokio::test]
async fn test_unknown_references_return_404() {
    let app = spawn_app().await;
    let workshop_id = create_workshop(&app, 5, "automated").await;
    let user_id = create_user(&app, "kim").await;

    let (status, _) = register(&app, user_id, 999).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = register(&app, 999, workshop_id).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(registered_seats(&app, workshop_id).await, 0);

    let (status, body) = send(
        &app,
        "POST",
        "/api/registrations",
        Some(json!({ "workshopId": workshop_id })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "userId");
}

#[tokio::test]
async fn test_closed_workshop_rejects_registrations() {
    let app = spawn_app().await;
    let workshop_id = create_workshop(&app, 5, "automated").await;
    let user_id = create_user(&app, "lee").await;

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/workshops/{workshop_id}"),
        Some(json!({ "status": "inactive" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = register(&app, user_id, workshop_id).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_status_lifecycle_and_seat_release() {
    let app = spawn_app().await;
    let workshop_id = create_workshop(&app, 2, "manual").await;
    let user_id = create_user(&app, "ana").await;

    let (_, registration) = register(&app, user_id, workshop_id).await;
    let id = registration["id"].as_i64().unwrap();

    let (status, body) = set_status(&app, id, "completed").await;
    assert_eq!(
        status,
        StatusCode::CONFLICT,
        "pending cannot jump to completed: {body}"
    );

    let (status, body) = set_status(&app, id, "confirmed").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "confirmed");
    assert_eq!(registered_seats(&app, workshop_id).await, 1);

    let (status, body) = set_status(&app, id, "cancelled").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "cancelled");
    assert_eq!(registered_seats(&app, workshop_id).await, 0);

    let (status, _) = set_status(&app, id, "cancelled").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(registered_seats(&app, workshop_id).await, 0);

    // A cancelled registration frees the user to sign up again.
    let (status, _) = register(&app, user_id, workshop_id).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = set_status(&app, 999, "confirmed").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_seats_cannot_drop_below_registered() {
    let app = spawn_app().await;
    let workshop_id = create_workshop(&app, 3, "automated").await;

    for name in ["ivy", "joe"] {
        let user_id = create_user(&app, name).await;
        let (status, _) = register(&app, user_id, workshop_id).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let uri = format!("/api/workshops/{workshop_id}");
    let (status, body) = send(&app, "PUT", &uri, Some(json!({ "seats": 1 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "seats");

    let (status, body) = send(&app, "PUT", &uri, Some(json!({ "seats": 2 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["seats"], 2);
    assert_eq!(body["registeredSeats"], 2);
}

#[tokio::test]
async fn test_deleting_workshop_removes_its_registrations() {
    let app = spawn_app().await;
    let workshop_id = create_workshop(&app, 3, "automated").await;
    let user_id = create_user(&app, "max").await;
    let (_, registration) = register(&app, user_id, workshop_id).await;
    let id = registration["id"].as_i64().unwrap();

    let uri = format!("/api/workshops/{workshop_id}");
    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &format!("/api/registrations/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
