#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use tripboard_api::auth::jwt::JwtConfig;
use tripboard_api::config::ServerConfig;
use tripboard_api::router::build_app_router;
use tripboard_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        invite_expiry_hours: Some(24),
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Build the full application router, with the production middleware stack,
/// over the given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app_router(AppState {
        pool,
        config: Arc::new(test_config()),
    })
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Register a user through the API, returning `(user_id, access_token)`.
pub async fn register(app: &Router, username: &str) -> (i64, String) {
    let body = serde_json::json!({
        "username": username,
        "email": format!("{username}@test.com"),
        "password": "correct-horse-battery",
    });
    let response = post_json(app.clone(), "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    (
        json["user"]["id"].as_i64().unwrap(),
        json["access_token"].as_str().unwrap().to_string(),
    )
}

/// Create a trip as `token`'s user, returning its id.
pub async fn create_trip(app: &Router, token: &str, title: &str) -> i64 {
    let response = post_json_auth(
        app.clone(),
        "/api/v1/trips",
        serde_json::json!({ "title": title }),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

/// Invite a new member with `role` and have them accept.
pub async fn join_as(app: &Router, owner_token: &str, trip_id: i64, role: &str, token: &str) {
    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/trips/{trip_id}/invites"),
        serde_json::json!({ "role": role }),
        owner_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let code = body_json(response).await["code"]
        .as_str()
        .unwrap()
        .to_string();

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/invites/{code}/accept"),
        serde_json::json!({}),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// Create an activity in a trip (optionally on a day), returning its id.
pub async fn create_activity(
    app: &Router,
    token: &str,
    trip_id: i64,
    day_id: Option<i64>,
    title: &str,
) -> i64 {
    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/trips/{trip_id}/activities"),
        serde_json::json!({ "title": title, "day_id": day_id }),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}
