//! Repository for the `check_ins` table.

use sqlx::PgPool;
use tripboard_core::types::DbId;

use crate::models::check_in::CheckIn;

const COLUMNS: &str = "id, user_id, place_id, activity_id, created_at";

/// Provides idempotent check-in creation.
pub struct CheckInRepo;

impl CheckInRepo {
    /// Record that `user_id` visited `place_id`.
    ///
    /// Idempotent per `(user_id, place_id)`: a repeat returns the original
    /// check-in with `false`; a fresh insert returns `true`.
    pub async fn create_if_absent(
        pool: &PgPool,
        user_id: DbId,
        place_id: DbId,
        activity_id: Option<DbId>,
    ) -> Result<(CheckIn, bool), sqlx::Error> {
        let insert = format!(
            "INSERT INTO check_ins (user_id, place_id, activity_id)
             VALUES ($1, $2, $3)
             ON CONFLICT ON CONSTRAINT uq_check_ins_user_place DO NOTHING
             RETURNING {COLUMNS}"
        );
        if let Some(created) = sqlx::query_as::<_, CheckIn>(&insert)
            .bind(user_id)
            .bind(place_id)
            .bind(activity_id)
            .fetch_optional(pool)
            .await?
        {
            return Ok((created, true));
        }

        let query = format!("SELECT {COLUMNS} FROM check_ins WHERE user_id = $1 AND place_id = $2");
        let existing = sqlx::query_as::<_, CheckIn>(&query)
            .bind(user_id)
            .bind(place_id)
            .fetch_one(pool)
            .await?;
        Ok((existing, false))
    }

    /// `true` if `user_id` has checked in at `place_id`.
    pub async fn exists(pool: &PgPool, user_id: DbId, place_id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM check_ins WHERE user_id = $1 AND place_id = $2)",
        )
        .bind(user_id)
        .bind(place_id)
        .fetch_one(pool)
        .await
    }
}
