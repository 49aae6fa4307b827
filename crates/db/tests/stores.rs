//! Integration tests for the ordering engine and place resolver running
//! against `PgStore`.

use assert_matches::assert_matches;
use sqlx::PgPool;
use tripboard_core::ordering::{compute_insertion_index, OrderingError, ScopeKey};
use tripboard_core::places::{resolve_place, PlaceCandidate, ResolutionOutcome};
use tripboard_db::models::activity::CreateActivity;
use tripboard_db::models::day::CreateDay;
use tripboard_db::models::review::CreateReview;
use tripboard_db::models::trip::{CreateTrip, Trip};
use tripboard_db::models::user::{CreateUser, User};
use tripboard_db::repositories::{
    ActivityRepo, CheckInRepo, DayRepo, PlaceRepo, ReviewRepo, TripRepo, UserRepo,
};
use tripboard_db::stores::PgStore;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn setup(pool: &PgPool) -> (User, Trip) {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: "planner".to_string(),
            email: "planner@test.com".to_string(),
            password_hash: "not-a-real-hash".to_string(),
        },
    )
    .await
    .unwrap();
    let trip = TripRepo::create(
        pool,
        user.id,
        &CreateTrip {
            title: "Tokyo".to_string(),
            description: None,
            start_date: None,
            end_date: None,
        },
    )
    .await
    .unwrap();
    (user, trip)
}

async fn pooled_activity(pool: &PgPool, user: &User, trip: &Trip, order_index: f64) -> i64 {
    let input = CreateActivity {
        day_id: None,
        title: format!("Activity at {order_index}"),
        notes: None,
        starts_at: None,
        location: None,
    };
    ActivityRepo::create(pool, trip.id, user.id, &input, order_index, None)
        .await
        .unwrap()
        .id
}

fn tokyo_tower(latitude: f64, longitude: f64) -> PlaceCandidate {
    PlaceCandidate {
        name: "Tokyo Tower".to_string(),
        latitude,
        longitude,
        address: None,
        external_id: None,
        provider: None,
    }
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_append_and_bisect_in_unscheduled_pool(pool: PgPool) {
    let (user, trip) = setup(&pool).await;
    let store = PgStore::new(pool.clone());
    let scope = ScopeKey::Unscheduled { trip_id: trip.id };

    let first = compute_insertion_index(&store, scope, None, None).await.unwrap();
    assert_eq!(first, 1000.0);
    let a = pooled_activity(&pool, &user, &trip, first).await;

    let second = compute_insertion_index(&store, scope, None, None).await.unwrap();
    assert_eq!(second, 2000.0);
    let b = pooled_activity(&pool, &user, &trip, second).await;

    let mid = compute_insertion_index(&store, scope, Some(a), Some(b)).await.unwrap();
    assert_eq!(mid, 1500.0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_degenerate_scope_is_renumbered_in_one_statement(pool: PgPool) {
    let (user, trip) = setup(&pool).await;
    let store = PgStore::new(pool.clone());
    let scope = ScopeKey::Unscheduled { trip_id: trip.id };

    let a = pooled_activity(&pool, &user, &trip, 0.0).await;
    let b = pooled_activity(&pool, &user, &trip, 0.0).await;
    let c = pooled_activity(&pool, &user, &trip, 0.0).await;

    let index = compute_insertion_index(&store, scope, Some(a), Some(b)).await.unwrap();
    assert_eq!(index, 1500.0);

    let rows = ActivityRepo::list_for_trip(&pool, trip.id).await.unwrap();
    let stored: Vec<(i64, f64)> = rows.iter().map(|r| (r.id, r.order_index)).collect();
    assert_eq!(stored, vec![(a, 1000.0), (b, 2000.0), (c, 3000.0)]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_equal_indices_list_in_id_order(pool: PgPool) {
    let (user, trip) = setup(&pool).await;

    let first = pooled_activity(&pool, &user, &trip, 1500.0).await;
    let second = pooled_activity(&pool, &user, &trip, 1500.0).await;
    let earlier = pooled_activity(&pool, &user, &trip, 500.0).await;

    let listed: Vec<i64> = ActivityRepo::list_for_trip(&pool, trip.id)
        .await
        .unwrap()
        .iter()
        .map(|a| a.id)
        .collect();
    assert_eq!(listed, vec![earlier, first, second]);

    let mut day_ids = Vec::new();
    for title in ["Asakusa", "Shibuya"] {
        let input = CreateDay {
            title: Some(title.to_string()),
            date: None,
        };
        day_ids.push(DayRepo::create(&pool, trip.id, &input, 2000.0).await.unwrap().id);
    }
    let listed: Vec<i64> = DayRepo::list_for_trip(&pool, trip.id)
        .await
        .unwrap()
        .iter()
        .map(|d| d.id)
        .collect();
    assert_eq!(listed, day_ids);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_tied_anchors_in_reverse_order_are_rejected_before_writing(pool: PgPool) {
    let (user, trip) = setup(&pool).await;
    let store = PgStore::new(pool.clone());
    let scope = ScopeKey::Unscheduled { trip_id: trip.id };

    let first = pooled_activity(&pool, &user, &trip, 1500.0).await;
    let second = pooled_activity(&pool, &user, &trip, 1500.0).await;
    let other = pooled_activity(&pool, &user, &trip, 7.0).await;

    let err = compute_insertion_index(&store, scope, Some(second), Some(first))
        .await
        .unwrap_err();
    assert_matches!(err, OrderingError::Validation(_));

    let mut indices: Vec<(i64, f64)> = ActivityRepo::list_for_trip(&pool, trip.id)
        .await
        .unwrap()
        .iter()
        .map(|a| (a.id, a.order_index))
        .collect();
    indices.sort_by_key(|&(id, _)| id);
    assert_eq!(indices, vec![(first, 1500.0), (second, 1500.0), (other, 7.0)]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_anchor_from_another_scope_is_rejected(pool: PgPool) {
    let (user, trip) = setup(&pool).await;
    let store = PgStore::new(pool.clone());
    let day = DayRepo::create(&pool, trip.id, &CreateDay { title: None, date: None }, 1000.0)
        .await
        .unwrap();
    let pooled = pooled_activity(&pool, &user, &trip, 1000.0).await;

    let result =
        compute_insertion_index(&store, ScopeKey::Day { day_id: day.id }, Some(pooled), None)
            .await;
    assert_matches!(result, Err(OrderingError::Validation(_)));
}

// ---------------------------------------------------------------------------
// Places
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_proximity_merges_nearby_same_name(pool: PgPool) {
    let store = PgStore::new(pool);

    let first = resolve_place(&store, &tokyo_tower(35.6586, 139.7454)).await.unwrap();
    assert_eq!(first.outcome, ResolutionOutcome::Created);

    let near = resolve_place(&store, &tokyo_tower(35.6587, 139.7455)).await.unwrap();
    assert_eq!(near.outcome, ResolutionOutcome::MatchedProximity);
    assert_eq!(near.place_id, first.place_id);

    let far = resolve_place(&store, &tokyo_tower(35.70, 139.80)).await.unwrap();
    assert_eq!(far.outcome, ResolutionOutcome::Created);
    assert_ne!(far.place_id, first.place_id);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_external_id_resolution_is_idempotent(pool: PgPool) {
    let store = PgStore::new(pool.clone());
    let candidate = PlaceCandidate {
        external_id: Some("ChIJCewJkL2LGGAR3Qmk0vCTGkg".to_string()),
        provider: Some("google".to_string()),
        ..tokyo_tower(35.6586, 139.7454)
    };

    let first = resolve_place(&store, &candidate).await.unwrap();
    let again = resolve_place(&store, &candidate).await.unwrap();
    assert_eq!(first.outcome, ResolutionOutcome::Created);
    assert_eq!(again.outcome, ResolutionOutcome::MatchedExternal);
    assert_eq!(again.place_id, first.place_id);

    // A racing insert of the same provider key lands on the existing row.
    let raced = PlaceRepo::insert(&pool, &candidate).await.unwrap();
    assert_eq!(raced, first.place_id);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_check_in_is_idempotent_and_feeds_stats(pool: PgPool) {
    let (user, _trip) = setup(&pool).await;
    let store = PgStore::new(pool.clone());
    let place = resolve_place(&store, &tokyo_tower(35.6586, 139.7454)).await.unwrap();

    let (first, created) =
        CheckInRepo::create_if_absent(&pool, user.id, place.place_id, None).await.unwrap();
    assert!(created);
    let (second, created) =
        CheckInRepo::create_if_absent(&pool, user.id, place.place_id, None).await.unwrap();
    assert!(!created);
    assert_eq!(second.id, first.id);

    ReviewRepo::create(
        &pool,
        user.id,
        place.place_id,
        &CreateReview {
            rating: 4,
            content: "Worth the climb".to_string(),
        },
    )
    .await
    .unwrap();

    let stats = PlaceRepo::stats(&pool, place.place_id).await.unwrap();
    assert_eq!(stats.check_in_count, 1);
    assert_eq!(stats.review_count, 1);
    assert_eq!(stats.average_rating, Some(4.0));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_second_review_violates_unique_constraint(pool: PgPool) {
    let (user, _trip) = setup(&pool).await;
    let store = PgStore::new(pool.clone());
    let place = resolve_place(&store, &tokyo_tower(35.6586, 139.7454)).await.unwrap();
    let review = CreateReview {
        rating: 5,
        content: "Great".to_string(),
    };

    ReviewRepo::create(&pool, user.id, place.place_id, &review).await.unwrap();
    let err = ReviewRepo::create(&pool, user.id, place.place_id, &review)
        .await
        .unwrap_err();
    let constraint = err.as_database_error().and_then(|e| e.constraint());
    assert_eq!(constraint, Some("uq_reviews_user_place"));
}
