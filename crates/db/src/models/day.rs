//! Itinerary day model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tripboard_core::ordering::ScopeKey;
use tripboard_core::types::{DbId, Timestamp};
use validator::Validate;

/// A row from the `days` table. Ordered within its trip by `order_index`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Day {
    pub id: DbId,
    pub trip_id: DbId,
    pub title: Option<String>,
    pub date: Option<NaiveDate>,
    pub order_index: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Day {
    /// The scope this day is ordered in.
    pub fn scope(&self) -> ScopeKey {
        ScopeKey::Itinerary {
            trip_id: self.trip_id,
        }
    }
}

/// DTO for creating a day. Days are always appended to the itinerary.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDay {
    #[validate(length(max = 200))]
    pub title: Option<String>,
    pub date: Option<NaiveDate>,
}

/// DTO for updating a day. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateDay {
    #[validate(length(max = 200))]
    pub title: Option<String>,
    pub date: Option<NaiveDate>,
}
