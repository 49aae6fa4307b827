//! Domain error taxonomy shared by every Tripboard layer.
//!
//! The API maps each variant to one HTTP status; see `tripboard_api::error`.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A trip, day, activity, comment, place or member that does not exist.
    /// Always reported ahead of any membership check.
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// Malformed input: bad anchors, out-of-range coordinates, unknown
    /// role names, changes to the owner's membership.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The operation lost to existing state, e.g. an invite already used.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// No caller identity, or a bad token or password.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The caller is known but is not a member of the trip, or ranks too low.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
