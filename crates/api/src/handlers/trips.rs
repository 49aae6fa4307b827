//! Handlers for the `/trips` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tripboard_core::access::ResourceRef;
use tripboard_core::error::CoreError;
use tripboard_core::roles::Role;
use tripboard_core::types::DbId;
use tripboard_db::models::trip::{check_date_range, CreateTrip, Trip, TripWithRole, UpdateTrip};
use tripboard_db::repositories::TripRepo;

use crate::error::{validate_input, AppError, AppResult};
use crate::middleware::access::require_role;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

fn trip_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Trip", id })
}

/// POST /api/v1/trips
///
/// The caller becomes the trip's owner.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateTrip>,
) -> AppResult<(StatusCode, Json<Trip>)> {
    validate_input(&input)?;
    input.check_dates()?;

    let trip = TripRepo::create(&state.pool, user.user_id, &input).await?;
    tracing::info!(trip_id = trip.id, owner_id = user.user_id, "Trip created");
    Ok((StatusCode::CREATED, Json(trip)))
}

/// GET /api/v1/trips
///
/// Trips the caller is a member of, with their role in each.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<TripWithRole>>>> {
    let trips = TripRepo::list_for_user(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: trips }))
}

/// GET /api/v1/trips/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Trip>> {
    require_role(&state, &user, ResourceRef::Trip(id), Role::Viewer).await?;
    let trip = TripRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| trip_not_found(id))?;
    Ok(Json(trip))
}

/// PUT /api/v1/trips/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTrip>,
) -> AppResult<Json<Trip>> {
    validate_input(&input)?;
    require_role(&state, &user, ResourceRef::Trip(id), Role::Editor).await?;

    let current = TripRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| trip_not_found(id))?;
    check_date_range(
        input.start_date.or(current.start_date),
        input.end_date.or(current.end_date),
    )?;

    let trip = TripRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| trip_not_found(id))?;
    Ok(Json(trip))
}

/// DELETE /api/v1/trips/{id}
///
/// Owner only. Everything nested under the trip is removed with it.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    require_role(&state, &user, ResourceRef::Trip(id), Role::Owner).await?;
    if TripRepo::delete(&state.pool, id).await? {
        tracing::info!(trip_id = id, "Trip deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(trip_not_found(id))
    }
}
