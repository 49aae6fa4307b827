//! Handlers for trip invites.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use tripboard_core::access::ResourceRef;
use tripboard_core::error::CoreError;
use tripboard_core::roles::Role;
use tripboard_core::types::DbId;
use tripboard_db::models::member::{CreateInvite, TripInvite, TripMember};
use tripboard_db::repositories::InviteRepo;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::access::require_role;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// POST /api/v1/trips/{id}/invites
///
/// Owner only. Returns the invite with its single-use code.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(trip_id): Path<DbId>,
    Json(input): Json<CreateInvite>,
) -> AppResult<(StatusCode, Json<TripInvite>)> {
    let role: Role = input.role.parse()?;
    if !role.is_invitable() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Invites may grant viewer or editor, not {role}"
        ))));
    }
    require_role(&state, &user, ResourceRef::Trip(trip_id), Role::Owner).await?;

    let code = Uuid::new_v4().simple().to_string();
    let expires_at = state
        .config
        .invite_expiry_hours
        .map(|hours| Utc::now() + chrono::Duration::hours(hours));

    let invite =
        InviteRepo::create(&state.pool, trip_id, &code, role, user.user_id, expires_at).await?;
    tracing::info!(trip_id, invite_id = invite.id, %role, "Invite created");
    Ok((StatusCode::CREATED, Json(invite)))
}

/// POST /api/v1/invites/{code}/accept
///
/// Any authenticated user may redeem an unused, unexpired code. Existing
/// members keep their role if it already ranks at least as high.
pub async fn accept(
    State(state): State<AppState>,
    user: AuthUser,
    Path(code): Path<String>,
) -> AppResult<Json<TripMember>> {
    if let Some(member) = InviteRepo::accept(&state.pool, &code, user.user_id).await? {
        tracing::info!(
            trip_id = member.trip_id,
            user_id = user.user_id,
            role = %member.role,
            "Invite accepted"
        );
        return Ok(Json(member));
    }

    let invite = InviteRepo::find_by_code(&state.pool, &code)
        .await?
        .ok_or_else(|| AppError::NotFound("Invite not found".into()))?;
    if invite.accepted_by.is_some() {
        Err(AppError::Core(CoreError::Conflict(
            "Invite has already been used".into(),
        )))
    } else {
        Err(AppError::Core(CoreError::Validation(
            "Invite has expired".into(),
        )))
    }
}
