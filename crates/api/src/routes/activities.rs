//! Route definitions for the `/activities` resource, including its comments.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{activities, comments};
use crate::state::AppState;

/// Routes mounted at `/activities`.
///
/// ```text
/// GET    /{id}            -> get_by_id
/// PUT    /{id}            -> update
/// DELETE /{id}            -> delete
/// POST   /{id}/move       -> move_activity
/// POST   /{id}/reorder    -> reorder
/// GET    /{id}/comments   -> comments::list
/// POST   /{id}/comments   -> comments::create
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(activities::get_by_id)
                .put(activities::update)
                .delete(activities::delete),
        )
        .route("/{id}/move", post(activities::move_activity))
        .route("/{id}/reorder", post(activities::reorder))
        .route(
            "/{id}/comments",
            get(comments::list).post(comments::create),
        )
}
