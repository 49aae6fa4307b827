//! Handlers for trip membership (`/trips/{id}/members`, `/trips/{id}/leave`).
//!
//! The owner row is fixed for the trip's lifetime: it cannot be demoted,
//! removed or leave, and no one can be promoted to owner.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tripboard_core::access::ResourceRef;
use tripboard_core::error::CoreError;
use tripboard_core::roles::Role;
use tripboard_core::types::DbId;
use tripboard_db::models::member::{MemberWithUser, TripMember, UpdateMemberRole};
use tripboard_db::repositories::MemberRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::access::require_role;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Load a member and refuse to act on the owner.
async fn find_non_owner(state: &AppState, trip_id: DbId, user_id: DbId) -> AppResult<TripMember> {
    let member = MemberRepo::find(&state.pool, trip_id, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Member",
            id: user_id,
        }))?;
    if member.role.parse::<Role>()? == Role::Owner {
        return Err(AppError::Core(CoreError::Validation(
            "The trip owner's membership cannot be changed".into(),
        )));
    }
    Ok(member)
}

/// GET /api/v1/trips/{id}/members
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(trip_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<MemberWithUser>>>> {
    require_role(&state, &user, ResourceRef::Trip(trip_id), Role::Viewer).await?;
    let members = MemberRepo::list_for_trip(&state.pool, trip_id).await?;
    Ok(Json(DataResponse { data: members }))
}

/// PUT /api/v1/trips/{id}/members/{user_id}
pub async fn update_role(
    State(state): State<AppState>,
    user: AuthUser,
    Path((trip_id, member_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateMemberRole>,
) -> AppResult<Json<TripMember>> {
    let role: Role = input.role.parse()?;
    if role == Role::Owner {
        return Err(AppError::Core(CoreError::Validation(
            "Ownership cannot be transferred".into(),
        )));
    }
    require_role(&state, &user, ResourceRef::Trip(trip_id), Role::Owner).await?;
    find_non_owner(&state, trip_id, member_id).await?;

    let member = MemberRepo::update_role(&state.pool, trip_id, member_id, role)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Member",
            id: member_id,
        }))?;
    tracing::info!(trip_id, user_id = member_id, %role, "Member role changed");
    Ok(Json(member))
}

/// DELETE /api/v1/trips/{id}/members/{user_id}
pub async fn remove(
    State(state): State<AppState>,
    user: AuthUser,
    Path((trip_id, member_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    require_role(&state, &user, ResourceRef::Trip(trip_id), Role::Owner).await?;
    find_non_owner(&state, trip_id, member_id).await?;

    MemberRepo::remove(&state.pool, trip_id, member_id).await?;
    tracing::info!(trip_id, user_id = member_id, "Member removed");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/trips/{id}/leave
pub async fn leave(
    State(state): State<AppState>,
    user: AuthUser,
    Path(trip_id): Path<DbId>,
) -> AppResult<StatusCode> {
    let membership = require_role(&state, &user, ResourceRef::Trip(trip_id), Role::Viewer).await?;
    if membership.role == Role::Owner {
        return Err(AppError::Core(CoreError::Validation(
            "The owner cannot leave their own trip".into(),
        )));
    }

    MemberRepo::remove(&state.pool, trip_id, user.user_id).await?;
    tracing::info!(trip_id, user_id = user.user_id, "Member left trip");
    Ok(StatusCode::NO_CONTENT)
}
