//! Route definitions for comments, invites, check-ins and places: resources
//! addressed by their own id rather than through a trip.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::{check_ins, comments, invites, places};
use crate::state::AppState;

/// Routes mounted at `/comments`.
pub fn comment_router() -> Router<AppState> {
    Router::new().route("/{id}", delete(comments::delete))
}

/// Routes mounted at `/invites`.
pub fn invite_router() -> Router<AppState> {
    Router::new().route("/{code}/accept", post(invites::accept))
}

/// Routes mounted at `/checkins`.
pub fn check_in_router() -> Router<AppState> {
    Router::new().route("/", post(check_ins::create))
}

/// Routes mounted at `/places`.
///
/// ```text
/// GET  /{id}          -> get_by_id
/// POST /{id}/reviews  -> create_review
/// ```
pub fn place_router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(places::get_by_id))
        .route("/{id}/reviews", post(places::create_review))
}
