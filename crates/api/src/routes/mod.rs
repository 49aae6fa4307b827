pub mod activities;
pub mod auth;
pub mod days;
pub mod health;
pub mod social;
pub mod trips;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                           register (public)
/// /auth/login                              login (public)
///
/// /trips                                   list, create
/// /trips/{id}                              get, update, delete
/// /trips/{id}/members                      list
/// /trips/{id}/members/{user_id}            change role, remove
/// /trips/{id}/leave                        leave (POST)
/// /trips/{id}/invites                      create invite (POST)
/// /trips/{id}/days                         list, create (append)
/// /trips/{id}/activities                   list, create (append)
///
/// /days/{id}                               update, delete
/// /days/{id}/reorder                       reorder (POST)
///
/// /activities/{id}                         get, update, delete
/// /activities/{id}/move                    move to day or pool (POST)
/// /activities/{id}/reorder                 reorder within scope (POST)
/// /activities/{id}/comments                list, create
///
/// /comments/{id}                           delete
/// /invites/{code}/accept                   accept (POST)
/// /checkins                                check in (POST)
/// /places/{id}                             place detail with aggregates
/// /places/{id}/reviews                     create review (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/trips", trips::router())
        .nest("/days", days::router())
        .nest("/activities", activities::router())
        .nest("/comments", social::comment_router())
        .nest("/invites", social::invite_router())
        .nest("/checkins", social::check_in_router())
        .nest("/places", social::place_router())
}
