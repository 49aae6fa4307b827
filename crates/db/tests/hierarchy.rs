//! Integration tests for the trip hierarchy against a real database:
//! trip creation with its owner membership, access resolution through
//! `PgStore`, invite acceptance and day deletion.

use assert_matches::assert_matches;
use sqlx::PgPool;
use tripboard_core::access::{check_access, AccessError, Denial, ResourceRef};
use tripboard_core::roles::Role;
use tripboard_db::models::activity::CreateActivity;
use tripboard_db::models::comment::CreateComment;
use tripboard_db::models::day::CreateDay;
use tripboard_db::models::trip::CreateTrip;
use tripboard_db::models::user::{CreateUser, User};
use tripboard_db::repositories::{
    ActivityRepo, CommentRepo, DayRepo, InviteRepo, MemberRepo, TripRepo, UserRepo,
};
use tripboard_db::stores::PgStore;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_user(pool: &PgPool, username: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@test.com"),
            password_hash: "not-a-real-hash".to_string(),
        },
    )
    .await
    .unwrap()
}

fn new_trip(title: &str) -> CreateTrip {
    CreateTrip {
        title: title.to_string(),
        description: None,
        start_date: None,
        end_date: None,
    }
}

fn new_activity(day_id: Option<i64>, title: &str) -> CreateActivity {
    CreateActivity {
        day_id,
        title: title.to_string(),
        notes: None,
        starts_at: None,
        location: None,
    }
}

fn no_day() -> CreateDay {
    CreateDay {
        title: None,
        date: None,
    }
}

// ---------------------------------------------------------------------------
// Trips and membership
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_trip_creation_grants_owner_membership(pool: PgPool) {
    let owner = new_user(&pool, "owner").await;
    let trip = TripRepo::create(&pool, owner.id, &new_trip("Kyoto")).await.unwrap();

    let member = MemberRepo::find(&pool, trip.id, owner.id).await.unwrap().unwrap();
    assert_eq!(member.role, "owner");

    let listed = TripRepo::list_for_user(&pool, owner.id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].trip.id, trip.id);
    assert_eq!(listed[0].role, "owner");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_owner_cannot_be_demoted_or_removed(pool: PgPool) {
    let owner = new_user(&pool, "owner").await;
    let trip = TripRepo::create(&pool, owner.id, &new_trip("Kyoto")).await.unwrap();

    let demoted = MemberRepo::update_role(&pool, trip.id, owner.id, Role::Viewer)
        .await
        .unwrap();
    assert!(demoted.is_none());
    assert!(!MemberRepo::remove(&pool, trip.id, owner.id).await.unwrap());
}

// ---------------------------------------------------------------------------
// Access resolution
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_access_resolves_through_every_level(pool: PgPool) {
    let owner = new_user(&pool, "owner").await;
    let outsider = new_user(&pool, "outsider").await;
    let trip = TripRepo::create(&pool, owner.id, &new_trip("Kyoto")).await.unwrap();
    let day = DayRepo::create(&pool, trip.id, &no_day(), 1000.0).await.unwrap();
    let activity = ActivityRepo::create(
        &pool,
        trip.id,
        owner.id,
        &new_activity(Some(day.id), "Fushimi Inari"),
        1000.0,
        None,
    )
    .await
    .unwrap();
    let comment = CommentRepo::create(
        &pool,
        activity.id,
        owner.id,
        &CreateComment {
            content: "Go early".to_string(),
        },
    )
    .await
    .unwrap();

    let store = PgStore::new(pool.clone());
    for resource in [
        ResourceRef::Trip(trip.id),
        ResourceRef::Day(day.id),
        ResourceRef::Activity(activity.id),
        ResourceRef::Comment(comment.id),
    ] {
        let membership = check_access(&store, owner.id, resource, Role::Owner)
            .await
            .unwrap();
        assert_eq!(membership.trip_id, trip.id);

        let denied = check_access(&store, outsider.id, resource, Role::Viewer).await;
        assert_matches!(denied, Err(AccessError::Forbidden(Denial::NotMember)));
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_access_to_missing_resources_is_not_found(pool: PgPool) {
    let user = new_user(&pool, "someone").await;
    let store = PgStore::new(pool);

    let result = check_access(&store, user.id, ResourceRef::Trip(9_999), Role::Viewer).await;
    assert_matches!(result, Err(AccessError::NotFound { entity: "Trip", id: 9_999 }));

    let result = check_access(&store, user.id, ResourceRef::Comment(42), Role::Viewer).await;
    assert_matches!(result, Err(AccessError::NotFound { entity: "Comment", .. }));
}

// ---------------------------------------------------------------------------
// Invites
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_invite_is_single_use(pool: PgPool) {
    let owner = new_user(&pool, "owner").await;
    let guest = new_user(&pool, "guest").await;
    let other = new_user(&pool, "other").await;
    let trip = TripRepo::create(&pool, owner.id, &new_trip("Kyoto")).await.unwrap();
    InviteRepo::create(&pool, trip.id, "code-1", Role::Editor, owner.id, None)
        .await
        .unwrap();

    let member = InviteRepo::accept(&pool, "code-1", guest.id).await.unwrap().unwrap();
    assert_eq!(member.role, "editor");

    assert!(InviteRepo::accept(&pool, "code-1", other.id).await.unwrap().is_none());
    assert!(MemberRepo::find(&pool, trip.id, other.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_invite_never_downgrades_existing_member(pool: PgPool) {
    let owner = new_user(&pool, "owner").await;
    let guest = new_user(&pool, "guest").await;
    let trip = TripRepo::create(&pool, owner.id, &new_trip("Kyoto")).await.unwrap();
    InviteRepo::create(&pool, trip.id, "as-editor", Role::Editor, owner.id, None)
        .await
        .unwrap();
    InviteRepo::create(&pool, trip.id, "as-viewer", Role::Viewer, owner.id, None)
        .await
        .unwrap();
    InviteRepo::create(&pool, trip.id, "for-owner", Role::Viewer, owner.id, None)
        .await
        .unwrap();

    InviteRepo::accept(&pool, "as-editor", guest.id).await.unwrap().unwrap();
    let member = InviteRepo::accept(&pool, "as-viewer", guest.id).await.unwrap().unwrap();
    assert_eq!(member.role, "editor");

    let member = InviteRepo::accept(&pool, "for-owner", owner.id).await.unwrap().unwrap();
    assert_eq!(member.role, "owner");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_expired_invite_is_rejected(pool: PgPool) {
    let owner = new_user(&pool, "owner").await;
    let guest = new_user(&pool, "guest").await;
    let trip = TripRepo::create(&pool, owner.id, &new_trip("Kyoto")).await.unwrap();
    let past = chrono::Utc::now() - chrono::Duration::hours(1);
    InviteRepo::create(&pool, trip.id, "stale", Role::Viewer, owner.id, Some(past))
        .await
        .unwrap();

    assert!(InviteRepo::accept(&pool, "stale", guest.id).await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Day deletion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_deleting_day_appends_its_activities_to_pool(pool: PgPool) {
    let owner = new_user(&pool, "owner").await;
    let trip = TripRepo::create(&pool, owner.id, &new_trip("Kyoto")).await.unwrap();
    let day = DayRepo::create(&pool, trip.id, &no_day(), 1000.0).await.unwrap();

    let pooled = ActivityRepo::create(
        &pool,
        trip.id,
        owner.id,
        &new_activity(None, "Pooled"),
        5000.0,
        None,
    )
    .await
    .unwrap();
    let second = ActivityRepo::create(
        &pool,
        trip.id,
        owner.id,
        &new_activity(Some(day.id), "Second"),
        2000.0,
        None,
    )
    .await
    .unwrap();
    let first = ActivityRepo::create(
        &pool,
        trip.id,
        owner.id,
        &new_activity(Some(day.id), "First"),
        1000.0,
        None,
    )
    .await
    .unwrap();

    assert!(DayRepo::delete(&pool, day.id).await.unwrap());

    let activities = ActivityRepo::list_for_trip(&pool, trip.id).await.unwrap();
    let order: Vec<i64> = activities.iter().map(|a| a.id).collect();
    assert_eq!(order, vec![pooled.id, first.id, second.id]);
    assert!(activities.iter().all(|a| a.day_id.is_none()));
    assert_eq!(activities[1].order_index, 6000.0);
    assert_eq!(activities[2].order_index, 7000.0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_deleting_missing_day_returns_false(pool: PgPool) {
    assert!(!DayRepo::delete(&pool, 12_345).await.unwrap());
}
