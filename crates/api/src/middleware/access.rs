//! Trip-scoped role checks for handlers.
//!
//! Unlike a global RBAC role, a user's role differs per trip, so the check
//! needs the target resource and cannot be a plain extractor.

use tripboard_core::access::{check_access, Membership, ResourceRef};
use tripboard_core::roles::Role;

use super::auth::AuthUser;
use crate::error::AppResult;
use crate::state::AppState;

/// Require `user` to hold at least `min_role` in the trip owning `resource`.
///
/// Responds 404 if the resource (or its trip) is gone and 403 if the caller
/// is not a member or ranks too low.
pub async fn require_role(
    state: &AppState,
    user: &AuthUser,
    resource: ResourceRef,
    min_role: Role,
) -> AppResult<Membership> {
    let membership = check_access(&state.store(), user.user_id, resource, min_role).await?;
    Ok(membership)
}
