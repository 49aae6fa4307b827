//! Route definitions for the `/trips` resource and everything addressed
//! through a trip id.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{activities, days, invites, members, trips};
use crate::state::AppState;

/// Routes mounted at `/trips`.
///
/// ```text
/// GET    /                            -> list
/// POST   /                            -> create
/// GET    /{id}                        -> get_by_id
/// PUT    /{id}                        -> update
/// DELETE /{id}                        -> delete
///
/// GET    /{id}/members                -> members::list
/// PUT    /{id}/members/{user_id}      -> members::update_role
/// DELETE /{id}/members/{user_id}      -> members::remove
/// POST   /{id}/leave                  -> members::leave
/// POST   /{id}/invites                -> invites::create
///
/// GET    /{id}/days                   -> days::list
/// POST   /{id}/days                   -> days::create
/// GET    /{id}/activities             -> activities::list
/// POST   /{id}/activities             -> activities::create
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(trips::list).post(trips::create))
        .route(
            "/{id}",
            get(trips::get_by_id)
                .put(trips::update)
                .delete(trips::delete),
        )
        .route("/{id}/members", get(members::list))
        .route(
            "/{id}/members/{user_id}",
            put(members::update_role).delete(members::remove),
        )
        .route("/{id}/leave", post(members::leave))
        .route("/{id}/invites", post(invites::create))
        .route("/{id}/days", get(days::list).post(days::create))
        .route(
            "/{id}/activities",
            get(activities::list).post(activities::create),
        )
}
