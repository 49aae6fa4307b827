//! Trip entity model and DTOs.
//!
//! A trip is the root resource: it owns its membership table, days,
//! activities and (transitively) comments.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tripboard_core::error::CoreError;
use tripboard_core::types::{DbId, Timestamp};
use validator::Validate;

/// A row from the `trips` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Trip {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub owner_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A trip joined with the caller's role in it, for "my trips" listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TripWithRole {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub trip: Trip,
    pub role: String,
}

/// DTO for creating a new trip. The creator becomes its owner.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTrip {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl CreateTrip {
    pub fn check_dates(&self) -> Result<(), CoreError> {
        check_date_range(self.start_date, self.end_date)
    }
}

/// DTO for updating an existing trip. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateTrip {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Reject an end date that precedes the start date.
pub fn check_date_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(), CoreError> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => Err(CoreError::Validation(format!(
            "end_date {end} is before start_date {start}"
        ))),
        _ => Ok(()),
    }
}
