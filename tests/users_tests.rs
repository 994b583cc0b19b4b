//! Integration tests for account management.

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
    let db_path =
        std::env::temp_dir().join(format!("workshopwise-users-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());
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

fn user_payload(username: &str, role: &str) -> Value {
    json!({
        "username": username,
        "password": "s3cret-pass",
        "email": format!("{username}@workshopwise.com"),
        "name": "Test Person",
        "role": role,
        "company": "Acme Corp"
    })
}

async fn create_user(app: &Router, payload: Value) -> (StatusCode, Value) {
    send(app, "POST", "/api/users", Some(payload)).await
}

#[tokio::test]
async fn test_user_crud() {
    let app = spawn_app().await;

    let (status, created) = create_user(&app, user_payload("alice", "enterprise")).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["username"], "alice");
    assert_eq!(created["role"], "enterprise");
    assert_eq!(created["company"], "Acme Corp");
    assert!(created.get("password").is_none());
    assert!(created.get("passwordHash").is_none());

    let id = created["id"].as_i64().unwrap();
    let uri = format!("/api/users/{id}");

    let (status, fetched) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, updated) = send(
        &app,
        "PUT",
        &uri,
        Some(json!({ "name": "Alice Liddell", "company": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Alice Liddell");
    assert_eq!(updated["company"], Value::Null);
    assert_eq!(updated["email"], created["email"]);

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_username_and_email_conflict() {
    let app = spawn_app().await;

    let (status, _) = create_user(&app, user_payload("bob", "user")).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = create_user(&app, user_payload("bob", "user")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("bob"));

    let mut same_email = user_payload("robert", "user");
    same_email["email"] = json!("bob@workshopwise.com");
    let (status, _) = create_user(&app, same_email).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_invalid_user_payload() {
    let app = spawn_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/users",
        Some(json!({
            "username": "carol",
            "password": "123",
            "email": "not-an-email",
            "name": "Carol",
            "role": "superuser"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["password", "email", "role"]);
}

#[tokio::test]
async fn test_list_filters_by_role_and_query() {
    let app = spawn_app().await;

    for (name, role) in [("dave", "user"), ("erin", "admin"), ("frank", "enterprise")] {
        let (status, _) = create_user(&app, user_payload(name, role)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, all) = send(&app, "GET", "/api/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 3);
    assert_eq!(all[0]["username"], "frank");

    let (_, admins) = send(&app, "GET", "/api/users?role=admin", None).await;
    assert_eq!(admins.as_array().unwrap().len(), 1);
    assert_eq!(admins[0]["username"], "erin");

    let (_, by_email) = send(&app, "GET", "/api/users?q=DAVE%40", None).await;
    assert_eq!(by_email.as_array().unwrap().len(), 1);
    assert_eq!(by_email[0]["username"], "dave");
}

#[tokio::test]
async fn test_deleting_user_releases_seats() {
    let app = spawn_app().await;

    let (_, user) = create_user(&app, user_payload("gina", "user")).await;
    let user_id = user["id"].as_i64().unwrap();

    let (_, workshop) = send(
        &app,
        "POST",
        "/api/workshops",
        Some(json!({
            "title": "Design Systems",
            "company": "Pixel Co",
            "date": "2025-04-10",
            "time": "02:00 PM",
            "mode": "offline",
            "location": "Pune",
            "price": 499,
            "seats": 10,
            "image": "/images/design.png"
        })),
    )
    .await;
    let workshop_id = workshop["id"].as_i64().unwrap();

    let (status, _) = send(
        &app,
        "POST",
        "/api/registrations",
        Some(json!({ "userId": user_id, "workshopId": workshop_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(&app, "DELETE", &format!("/api/users/{user_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, workshop) = send(&app, "GET", &format!("/api/workshops/{workshop_id}"), None).await;
    assert_eq!(workshop["registeredSeats"], 0);

    let (_, registrations) = send(
        &app,
        "GET",
        &format!("/api/registrations/workshop/{workshop_id}"),
        None,
    )
    .await;
    assert!(registrations.as_array().unwrap().is_empty());
}
