//! Handlers for itinerary days.
//!
//! New days are appended to the trip's itinerary; reordering places a day
//! between two neighbours via the ordering engine.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tripboard_core::access::ResourceRef;
use tripboard_core::error::CoreError;
use tripboard_core::ordering::{compute_insertion_index, compute_reorder_index, ScopeKey};
use tripboard_core::roles::Role;
use tripboard_core::types::DbId;
use tripboard_db::models::day::{CreateDay, Day, UpdateDay};
use tripboard_db::repositories::DayRepo;

use super::ReorderRequest;
use crate::error::{validate_input, AppError, AppResult};
use crate::middleware::access::require_role;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

fn day_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Day", id })
}

/// GET /api/v1/trips/{id}/days
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(trip_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Day>>>> {
    require_role(&state, &user, ResourceRef::Trip(trip_id), Role::Viewer).await?;
    let days = DayRepo::list_for_trip(&state.pool, trip_id).await?;
    Ok(Json(DataResponse { data: days }))
}

/// POST /api/v1/trips/{id}/days
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(trip_id): Path<DbId>,
    Json(input): Json<CreateDay>,
) -> AppResult<(StatusCode, Json<Day>)> {
    validate_input(&input)?;
    require_role(&state, &user, ResourceRef::Trip(trip_id), Role::Editor).await?;

    let scope = ScopeKey::Itinerary { trip_id };
    let order_index = compute_insertion_index(&state.store(), scope, None, None).await?;
    let day = DayRepo::create(&state.pool, trip_id, &input, order_index).await?;
    Ok((StatusCode::CREATED, Json(day)))
}

/// PUT /api/v1/days/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateDay>,
) -> AppResult<Json<Day>> {
    validate_input(&input)?;
    require_role(&state, &user, ResourceRef::Day(id), Role::Editor).await?;
    let day = DayRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| day_not_found(id))?;
    Ok(Json(day))
}

/// DELETE /api/v1/days/{id}
///
/// The day's activities move to the end of the unscheduled pool.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    require_role(&state, &user, ResourceRef::Day(id), Role::Editor).await?;
    if DayRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(day_not_found(id))
    }
}

/// POST /api/v1/days/{id}/reorder
pub async fn reorder(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<ReorderRequest>,
) -> AppResult<Json<Day>> {
    require_role(&state, &user, ResourceRef::Day(id), Role::Editor).await?;
    let day = DayRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| day_not_found(id))?;

    let order_index = compute_reorder_index(
        &state.store(),
        day.scope(),
        day.id,
        input.after_id,
        input.before_id,
    )
    .await?;

    let day = DayRepo::set_order_index(&state.pool, id, order_index)
        .await?
        .ok_or_else(|| day_not_found(id))?;
    tracing::debug!(day_id = id, order_index, "Day reordered");
    Ok(Json(day))
}
