//! Handlers for activity comments.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tripboard_core::access::ResourceRef;
use tripboard_core::error::CoreError;
use tripboard_core::roles::Role;
use tripboard_core::types::DbId;
use tripboard_db::models::comment::{Comment, CommentWithAuthor, CreateComment};
use tripboard_db::repositories::CommentRepo;

use crate::error::{validate_input, AppError, AppResult};
use crate::middleware::access::require_role;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/activities/{id}/comments
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(activity_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<CommentWithAuthor>>>> {
    require_role(&state, &user, ResourceRef::Activity(activity_id), Role::Viewer).await?;
    let comments = CommentRepo::list_for_activity(&state.pool, activity_id).await?;
    Ok(Json(DataResponse { data: comments }))
}

/// POST /api/v1/activities/{id}/comments
///
/// Viewers may comment.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(activity_id): Path<DbId>,
    Json(input): Json<CreateComment>,
) -> AppResult<(StatusCode, Json<Comment>)> {
    validate_input(&input)?;
    require_role(&state, &user, ResourceRef::Activity(activity_id), Role::Viewer).await?;
    let comment = CommentRepo::create(&state.pool, activity_id, user.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// DELETE /api/v1/comments/{id}
///
/// Allowed for the comment's author and for the trip owner.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let membership = require_role(&state, &user, ResourceRef::Comment(id), Role::Viewer).await?;
    let comment = CommentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Comment",
            id,
        }))?;

    if comment.user_id != user.user_id && membership.role != Role::Owner {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the author or the trip owner can delete this comment".into(),
        )));
    }

    CommentRepo::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
