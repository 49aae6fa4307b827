//! HTTP-level tests for place resolution, check-ins and reviews.

mod common;

use axum::http::StatusCode;
use axum::Router;
use common::{body_json, create_trip, get_auth, join_as, post_json_auth, register};
use serde_json::{json, Value};
use sqlx::PgPool;

async fn create_located_activity(
    app: &Router,
    token: &str,
    trip_id: i64,
    location: Value,
) -> Value {
    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/trips/{trip_id}/activities"),
        json!({ "title": "Sightseeing", "location": location }),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

async fn check_in(app: &Router, token: &str, activity_id: i64) -> (StatusCode, Value) {
    let response = post_json_auth(
        app.clone(),
        "/api/v1/checkins",
        json!({ "activity_id": activity_id }),
        token,
    )
    .await;
    let status = response.status();
    (status, body_json(response).await)
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_nearby_activities_share_a_place(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, alice) = register(&app, "alice").await;
    let (_, bob) = register(&app, "bob").await;
    let trip_a = create_trip(&app, &alice, "Tokyo").await;
    let trip_b = create_trip(&app, &bob, "Japan").await;

    let first = create_located_activity(
        &app,
        &alice,
        trip_a,
        json!({ "name": "Tokyo Tower", "latitude": 35.6586, "longitude": 139.7454 }),
    )
    .await;
    let second = create_located_activity(
        &app,
        &bob,
        trip_b,
        json!({ "name": "  Tokyo Tower ", "latitude": 35.6590, "longitude": 139.7450 }),
    )
    .await;
    let far = create_located_activity(
        &app,
        &bob,
        trip_b,
        json!({ "name": "Tokyo Tower", "latitude": 35.6700, "longitude": 139.7454 }),
    )
    .await;

    assert!(first["place_id"].is_i64());
    assert_eq!(first["place_id"], second["place_id"]);
    assert_ne!(first["place_id"], far["place_id"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_external_id_matches_regardless_of_distance(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, token) = register(&app, "alice").await;
    let trip_id = create_trip(&app, &token, "Paris").await;

    let first = create_located_activity(
        &app,
        &token,
        trip_id,
        json!({
            "name": "Louvre",
            "latitude": 48.8606,
            "longitude": 2.3376,
            "external_id": "ChIJD3uTd9hx5kcR1IQvGfr8dbk",
            "provider": "google",
        }),
    )
    .await;
    let second = create_located_activity(
        &app,
        &token,
        trip_id,
        json!({
            "name": "Musée du Louvre",
            "latitude": 48.8700,
            "longitude": 2.3500,
            "external_id": "ChIJD3uTd9hx5kcR1IQvGfr8dbk",
            "provider": "google",
        }),
    )
    .await;
    assert_eq!(first["place_id"], second["place_id"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_invalid_location_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, token) = register(&app, "alice").await;
    let trip_id = create_trip(&app, &token, "Nowhere").await;

    let response = post_json_auth(
        app,
        &format!("/api/v1/trips/{trip_id}/activities"),
        json!({
            "title": "Off the map",
            "location": { "name": "Pole", "latitude": 91.0, "longitude": 0.0 },
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Check-ins and reviews
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_check_in_is_idempotent(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, token) = register(&app, "alice").await;
    let trip_id = create_trip(&app, &token, "Tokyo").await;
    let activity = create_located_activity(
        &app,
        &token,
        trip_id,
        json!({ "name": "Senso-ji", "latitude": 35.7148, "longitude": 139.7967 }),
    )
    .await;
    let activity_id = activity["id"].as_i64().unwrap();

    let (status, first) = check_in(&app, &token, activity_id).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["created"], true);
    assert_eq!(first["place_id"], activity["place_id"]);

    let (status, second) = check_in(&app, &token, activity_id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["created"], false);
    assert_eq!(second["id"], first["id"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_check_in_requires_location(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, token) = register(&app, "alice").await;
    let trip_id = create_trip(&app, &token, "Tokyo").await;
    let activity_id = common::create_activity(&app, &token, trip_id, None, "Rest").await;

    let (status, _) = check_in(&app, &token, activity_id).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_review_requires_check_in_and_is_unique(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, owner) = register(&app, "owner").await;
    let (_, viewer) = register(&app, "viewer").await;
    let trip_id = create_trip(&app, &owner, "Tokyo").await;
    join_as(&app, &owner, trip_id, "viewer", &viewer).await;

    let activity = create_located_activity(
        &app,
        &owner,
        trip_id,
        json!({ "name": "Meiji Jingu", "latitude": 35.6764, "longitude": 139.6993 }),
    )
    .await;
    let activity_id = activity["id"].as_i64().unwrap();
    let place_id = activity["place_id"].as_i64().unwrap();
    let reviews = format!("/api/v1/places/{place_id}/reviews");

    let response = post_json_auth(
        app.clone(),
        &reviews,
        json!({ "rating": 5, "content": "Peaceful" }),
        &viewer,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Viewers may check in.
    let (status, _) = check_in(&app, &viewer, activity_id).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = check_in(&app, &owner, activity_id).await;
    assert_eq!(status, StatusCode::CREATED);

    let response = post_json_auth(
        app.clone(),
        &reviews,
        json!({ "rating": 5, "content": "Peaceful" }),
        &viewer,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post_json_auth(
        app.clone(),
        &reviews,
        json!({ "rating": 4, "content": "Changed my mind" }),
        &viewer,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = post_json_auth(
        app.clone(),
        &reviews,
        json!({ "rating": 6, "content": "Too good" }),
        &owner,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json_auth(
        app.clone(),
        &reviews,
        json!({ "rating": 4, "content": "Crowded" }),
        &owner,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = get_auth(app, &format!("/api/v1/places/{place_id}"), &viewer).await;
    assert_eq!(response.status(), StatusCode::OK);
    let detail = body_json(response).await;
    assert_eq!(detail["name"], "Meiji Jingu");
    assert_eq!(detail["check_in_count"], 2);
    assert_eq!(detail["review_count"], 2);
    assert_eq!(detail["average_rating"], 4.5);
    assert_eq!(detail["reviews"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_missing_place_is_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, token) = register(&app, "alice").await;
    let response = get_auth(app, "/api/v1/places/424242", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
