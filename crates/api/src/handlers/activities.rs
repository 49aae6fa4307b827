//! Handlers for activities.
//!
//! An activity lives either on a day or in its trip's unscheduled pool.
//! Creation and cross-scope moves append at the end of the destination;
//! `reorder` repositions within the current scope. A supplied location is
//! resolved to a canonical place before the row is written.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tripboard_core::access::ResourceRef;
use tripboard_core::error::CoreError;
use tripboard_core::ordering::{compute_insertion_index, compute_reorder_index, ScopeKey};
use tripboard_core::places::{resolve_place, PlaceCandidate};
use tripboard_core::roles::Role;
use tripboard_core::types::DbId;
use tripboard_db::models::activity::{Activity, ActivityLocation, CreateActivity, UpdateActivity};
use tripboard_db::repositories::{ActivityRepo, DayRepo};

use super::ReorderRequest;
use crate::error::{validate_input, AppError, AppResult};
use crate::middleware::access::require_role;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /activities/{id}/move`.
#[derive(Debug, Deserialize)]
pub struct MoveActivity {
    /// Destination day; `null` or absent for the unscheduled pool.
    #[serde(default)]
    pub day_id: Option<DbId>,
}

fn activity_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Activity",
        id,
    })
}

/// The ordering scope for `day_id` within `trip_id`.
///
/// A missing day is 404; a day of another trip is a validation error.
async fn destination_scope(
    state: &AppState,
    trip_id: DbId,
    day_id: Option<DbId>,
) -> AppResult<ScopeKey> {
    if let Some(day_id) = day_id {
        let day = DayRepo::find_by_id(&state.pool, day_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Day",
                id: day_id,
            }))?;
        if day.trip_id != trip_id {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Day {day_id} does not belong to trip {trip_id}"
            ))));
        }
    }
    Ok(ScopeKey::for_activity(trip_id, day_id))
}

async fn resolve_location(state: &AppState, location: &ActivityLocation) -> AppResult<DbId> {
    let resolution = resolve_place(&state.store(), &PlaceCandidate::from(location)).await?;
    tracing::debug!(
        place_id = resolution.place_id,
        outcome = ?resolution.outcome,
        "Activity location resolved"
    );
    Ok(resolution.place_id)
}

/// GET /api/v1/trips/{id}/activities
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(trip_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Activity>>>> {
    require_role(&state, &user, ResourceRef::Trip(trip_id), Role::Viewer).await?;
    let activities = ActivityRepo::list_for_trip(&state.pool, trip_id).await?;
    Ok(Json(DataResponse { data: activities }))
}

/// POST /api/v1/trips/{id}/activities
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(trip_id): Path<DbId>,
    Json(input): Json<CreateActivity>,
) -> AppResult<(StatusCode, Json<Activity>)> {
    validate_input(&input)?;
    require_role(&state, &user, ResourceRef::Trip(trip_id), Role::Editor).await?;

    let scope = destination_scope(&state, trip_id, input.day_id).await?;
    let place_id = match &input.location {
        Some(location) => Some(resolve_location(&state, location).await?),
        None => None,
    };
    let order_index = compute_insertion_index(&state.store(), scope, None, None).await?;

    let activity = ActivityRepo::create(
        &state.pool,
        trip_id,
        user.user_id,
        &input,
        order_index,
        place_id,
    )
    .await?;
    tracing::info!(activity_id = activity.id, trip_id, %scope, "Activity created");
    Ok((StatusCode::CREATED, Json(activity)))
}

/// GET /api/v1/activities/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Activity>> {
    require_role(&state, &user, ResourceRef::Activity(id), Role::Viewer).await?;
    let activity = ActivityRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| activity_not_found(id))?;
    Ok(Json(activity))
}

/// PUT /api/v1/activities/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateActivity>,
) -> AppResult<Json<Activity>> {
    validate_input(&input)?;
    require_role(&state, &user, ResourceRef::Activity(id), Role::Editor).await?;

    let location = match &input.location {
        Some(location) => Some((location, resolve_location(&state, location).await?)),
        None => None,
    };
    let activity = ActivityRepo::update(&state.pool, id, &input, location)
        .await?
        .ok_or_else(|| activity_not_found(id))?;
    Ok(Json(activity))
}

/// DELETE /api/v1/activities/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    require_role(&state, &user, ResourceRef::Activity(id), Role::Editor).await?;
    if ActivityRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(activity_not_found(id))
    }
}

/// POST /api/v1/activities/{id}/move
///
/// Move to another day or to the pool, landing at the end of the
/// destination. Moving to the current scope changes nothing.
pub async fn move_activity(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<MoveActivity>,
) -> AppResult<Json<Activity>> {
    require_role(&state, &user, ResourceRef::Activity(id), Role::Editor).await?;
    let activity = ActivityRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| activity_not_found(id))?;

    let destination = destination_scope(&state, activity.trip_id, input.day_id).await?;
    if destination == activity.scope() {
        return Ok(Json(activity));
    }

    let order_index = compute_insertion_index(&state.store(), destination, None, None).await?;
    let moved = ActivityRepo::move_to(&state.pool, id, input.day_id, order_index)
        .await?
        .ok_or_else(|| activity_not_found(id))?;
    tracing::info!(activity_id = id, from = %activity.scope(), to = %destination, "Activity moved");
    Ok(Json(moved))
}

/// POST /api/v1/activities/{id}/reorder
pub async fn reorder(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<ReorderRequest>,
) -> AppResult<Json<Activity>> {
    require_role(&state, &user, ResourceRef::Activity(id), Role::Editor).await?;
    let activity = ActivityRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| activity_not_found(id))?;

    let order_index = compute_reorder_index(
        &state.store(),
        activity.scope(),
        id,
        input.after_id,
        input.before_id,
    )
    .await?;

    let activity = ActivityRepo::set_order_index(&state.pool, id, order_index)
        .await?
        .ok_or_else(|| activity_not_found(id))?;
    Ok(Json(activity))
}
