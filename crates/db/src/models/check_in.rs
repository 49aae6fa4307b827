//! Check-in model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tripboard_core::types::{DbId, Timestamp};

/// A row from the `check_ins` table. At most one per `(user_id, place_id)`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CheckIn {
    pub id: DbId,
    pub user_id: DbId,
    pub place_id: DbId,
    pub activity_id: Option<DbId>,
    pub created_at: Timestamp,
}

/// Request body for checking in at an activity's place.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCheckIn {
    pub activity_id: DbId,
}
