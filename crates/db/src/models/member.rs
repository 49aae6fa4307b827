//! Trip membership and invite models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tripboard_core::access::Membership;
use tripboard_core::error::CoreError;
use tripboard_core::roles::Role;
use tripboard_core::types::{DbId, Timestamp};

/// A row from the `trip_members` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TripMember {
    pub id: DbId,
    pub trip_id: DbId,
    pub user_id: DbId,
    pub role: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TripMember {
    /// Parse the stored role into the ranked [`Membership`] used for access checks.
    pub fn membership(&self) -> Result<Membership, CoreError> {
        Ok(Membership {
            trip_id: self.trip_id,
            user_id: self.user_id,
            role: self.role.parse::<Role>()?,
        })
    }
}

/// A member joined with their username, for member listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MemberWithUser {
    pub user_id: DbId,
    pub username: String,
    pub role: String,
    pub joined_at: Timestamp,
}

/// Request body for changing a member's role.
///
/// The role is kept as a string so unknown names surface as a validation
/// error rather than a deserialization rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateMemberRole {
    pub role: String,
}

/// A row from the `trip_invites` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TripInvite {
    pub id: DbId,
    pub trip_id: DbId,
    pub code: String,
    pub role: String,
    pub created_by: DbId,
    pub expires_at: Option<Timestamp>,
    pub accepted_by: Option<DbId>,
    pub accepted_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for creating an invite.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateInvite {
    pub role: String,
}
