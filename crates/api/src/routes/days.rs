//! Route definitions for the `/days` resource.

use axum::routing::{post, put};
use axum::Router;

use crate::handlers::days;
use crate::state::AppState;

/// Routes mounted at `/days`.
///
/// ```text
/// PUT    /{id}          -> update
/// DELETE /{id}          -> delete
/// POST   /{id}/reorder  -> reorder
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", put(days::update).delete(days::delete))
        .route("/{id}/reorder", post(days::reorder))
}
