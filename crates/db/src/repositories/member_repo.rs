//! Repository for the `trip_members` table.

use sqlx::PgPool;
use tripboard_core::roles::{Role, ROLE_OWNER};
use tripboard_core::types::DbId;

use crate::models::member::{MemberWithUser, TripMember};

const COLUMNS: &str = "id, trip_id, user_id, role, created_at, updated_at";

/// Provides membership lookups and owner-side management.
pub struct MemberRepo;

impl MemberRepo {
    /// Find the membership row for `(trip_id, user_id)`.
    pub async fn find(
        pool: &PgPool,
        trip_id: DbId,
        user_id: DbId,
    ) -> Result<Option<TripMember>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM trip_members WHERE trip_id = $1 AND user_id = $2");
        sqlx::query_as::<_, TripMember>(&query)
            .bind(trip_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List a trip's members with usernames, in join order.
    pub async fn list_for_trip(
        pool: &PgPool,
        trip_id: DbId,
    ) -> Result<Vec<MemberWithUser>, sqlx::Error> {
        sqlx::query_as::<_, MemberWithUser>(
            "SELECT m.user_id, u.username, m.role, m.created_at AS joined_at
             FROM trip_members m
             JOIN users u ON u.id = m.user_id
             WHERE m.trip_id = $1
             ORDER BY m.created_at, m.id",
        )
        .bind(trip_id)
        .fetch_all(pool)
        .await
    }

    /// Change a non-owner member's role.
    ///
    /// Returns `None` if the member does not exist or is the owner.
    pub async fn update_role(
        pool: &PgPool,
        trip_id: DbId,
        user_id: DbId,
        role: Role,
    ) -> Result<Option<TripMember>, sqlx::Error> {
        let query = format!(
            "UPDATE trip_members SET role = $3
             WHERE trip_id = $1 AND user_id = $2 AND role <> $4
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TripMember>(&query)
            .bind(trip_id)
            .bind(user_id)
            .bind(role.as_str())
            .bind(ROLE_OWNER)
            .fetch_optional(pool)
            .await
    }

    /// Remove a non-owner member. Returns `true` if a row was removed.
    pub async fn remove(pool: &PgPool, trip_id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM trip_members WHERE trip_id = $1 AND user_id = $2 AND role <> $3",
        )
        .bind(trip_id)
        .bind(user_id)
        .bind(ROLE_OWNER)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
