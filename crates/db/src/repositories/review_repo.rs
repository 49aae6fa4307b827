//! Repository for the `reviews` table.

use sqlx::PgPool;
use tripboard_core::types::DbId;

use crate::models::review::{CreateReview, Review, ReviewWithAuthor};

const COLUMNS: &str = "id, user_id, place_id, rating, content, created_at, updated_at";

/// Provides review creation and listing.
pub struct ReviewRepo;

impl ReviewRepo {
    /// Insert a review. A second review by the same user for the same place
    /// fails on `uq_reviews_user_place`.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        place_id: DbId,
        input: &CreateReview,
    ) -> Result<Review, sqlx::Error> {
        let query = format!(
            "INSERT INTO reviews (user_id, place_id, rating, content)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(user_id)
            .bind(place_id)
            .bind(input.rating)
            .bind(&input.content)
            .fetch_one(pool)
            .await
    }

    /// Most recent reviews for a place, newest first.
    pub async fn list_recent_for_place(
        pool: &PgPool,
        place_id: DbId,
        limit: i64,
    ) -> Result<Vec<ReviewWithAuthor>, sqlx::Error> {
        sqlx::query_as::<_, ReviewWithAuthor>(
            "SELECT r.id, r.user_id, u.username, r.rating, r.content, r.created_at
             FROM reviews r
             JOIN users u ON u.id = r.user_id
             WHERE r.place_id = $1
             ORDER BY r.created_at DESC, r.id DESC
             LIMIT $2",
        )
        .bind(place_id)
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
