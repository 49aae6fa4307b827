//! Handler for `POST /checkins`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tripboard_core::access::ResourceRef;
use tripboard_core::error::CoreError;
use tripboard_core::places::resolve_place;
use tripboard_core::roles::Role;
use tripboard_db::models::check_in::{CheckIn, CreateCheckIn};
use tripboard_db::repositories::{ActivityRepo, CheckInRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::access::require_role;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Check-in response. `created` is `false` when the caller had already
/// checked in at this place.
#[derive(Debug, Serialize)]
pub struct CheckInResponse {
    #[serde(flatten)]
    pub check_in: CheckIn,
    pub created: bool,
}

/// POST /api/v1/checkins
///
/// Check in at the place an activity points to. If the activity has a
/// location but no canonical place yet, the place is resolved and recorded
/// on the activity first.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateCheckIn>,
) -> AppResult<(StatusCode, Json<CheckInResponse>)> {
    let activity_id = input.activity_id;
    require_role(&state, &user, ResourceRef::Activity(activity_id), Role::Viewer).await?;

    let activity = ActivityRepo::find_by_id(&state.pool, activity_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Activity",
            id: activity_id,
        }))?;

    let place_id = match (activity.place_id, activity.place_candidate()) {
        (Some(place_id), _) => place_id,
        (None, Some(candidate)) => {
            let resolution = resolve_place(&state.store(), &candidate).await?;
            ActivityRepo::set_place(&state.pool, activity_id, resolution.place_id).await?;
            resolution.place_id
        }
        (None, None) => {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Activity {activity_id} has no location to check in at"
            ))));
        }
    };

    let (check_in, created) =
        CheckInRepo::create_if_absent(&state.pool, user.user_id, place_id, Some(activity_id))
            .await?;
    if created {
        tracing::info!(user_id = user.user_id, place_id, "Checked in");
    }

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(CheckInResponse { check_in, created })))
}
