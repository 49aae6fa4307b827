//! Request handlers, one module per resource.

pub mod activities;
pub mod auth;
pub mod check_ins;
pub mod comments;
pub mod days;
pub mod invites;
pub mod members;
pub mod places;
pub mod trips;

use serde::Deserialize;
use tripboard_core::types::DbId;

/// Request body for repositioning an item within its current scope.
///
/// `after_id` / `before_id` name the neighbours the item should land
/// between. With neither, the item moves to the end.
#[derive(Debug, Default, Deserialize)]
pub struct ReorderRequest {
    pub after_id: Option<DbId>,
    pub before_id: Option<DbId>,
}
