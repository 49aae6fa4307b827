//! Place review model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tripboard_core::types::{DbId, Timestamp};
use validator::Validate;

/// A row from the `reviews` table. At most one per `(user_id, place_id)`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Review {
    pub id: DbId,
    pub user_id: DbId,
    pub place_id: DbId,
    pub rating: i16,
    pub content: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A review joined with its author's username.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReviewWithAuthor {
    pub id: DbId,
    pub user_id: DbId,
    pub username: String,
    pub rating: i16,
    pub content: String,
    pub created_at: Timestamp,
}

/// DTO for reviewing a place the caller has checked in at.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateReview {
    #[validate(range(min = 1, max = 5))]
    pub rating: i16,
    #[validate(length(min = 1, max = 5000))]
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_must_be_between_one_and_five() {
        for (rating, ok) in [(0, false), (1, true), (5, true), (6, false)] {
            let input = CreateReview {
                rating,
                content: "Great view".to_string(),
            };
            assert_eq!(input.validate().is_ok(), ok, "rating {rating}");
        }
    }
}
