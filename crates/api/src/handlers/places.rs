//! Handlers for canonical places and their reviews.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tripboard_core::error::CoreError;
use tripboard_core::types::DbId;
use tripboard_db::models::place::PlaceDetail;
use tripboard_db::models::review::{CreateReview, Review};
use tripboard_db::repositories::{CheckInRepo, PlaceRepo, ReviewRepo};

use crate::error::{validate_input, AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Number of reviews embedded in a place detail response.
const RECENT_REVIEW_LIMIT: i64 = 20;

fn place_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Place", id })
}

/// GET /api/v1/places/{id}
///
/// Places are shared across trips, so any signed-in user may read them.
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<PlaceDetail>> {
    let place = PlaceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| place_not_found(id))?;
    let stats = PlaceRepo::stats(&state.pool, id).await?;
    let reviews = ReviewRepo::list_recent_for_place(&state.pool, id, RECENT_REVIEW_LIMIT).await?;
    Ok(Json(PlaceDetail {
        place,
        stats,
        reviews,
    }))
}

/// POST /api/v1/places/{id}/reviews
///
/// Requires a prior check-in at the place. One review per user and place;
/// a second attempt is 409.
pub async fn create_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<CreateReview>,
) -> AppResult<(StatusCode, Json<Review>)> {
    validate_input(&input)?;
    PlaceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| place_not_found(id))?;

    if !CheckInRepo::exists(&state.pool, user.user_id, id).await? {
        return Err(AppError::Core(CoreError::Forbidden(
            "Check in at this place before reviewing it".into(),
        )));
    }

    let review = ReviewRepo::create(&state.pool, user.user_id, id, &input).await?;
    tracing::info!(user_id = user.user_id, place_id = id, rating = review.rating, "Review created");
    Ok((StatusCode::CREATED, Json(review)))
}
