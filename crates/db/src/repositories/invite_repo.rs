//! Repository for the `trip_invites` table.
//!
//! Invites are single-use. Accepting one claims the row and grants the
//! membership in the same transaction.

use sqlx::PgPool;
use tripboard_core::roles::Role;
use tripboard_core::types::{DbId, Timestamp};

use crate::models::member::{TripInvite, TripMember};

const COLUMNS: &str =
    "id, trip_id, code, role, created_by, expires_at, accepted_by, accepted_at, created_at";

const MEMBER_COLUMNS: &str = "id, trip_id, user_id, role, created_at, updated_at";

/// Provides invite creation and acceptance.
pub struct InviteRepo;

impl InviteRepo {
    /// Insert a new invite, returning the created row.
    pub async fn create(
        pool: &PgPool,
        trip_id: DbId,
        code: &str,
        role: Role,
        created_by: DbId,
        expires_at: Option<Timestamp>,
    ) -> Result<TripInvite, sqlx::Error> {
        let query = format!(
            "INSERT INTO trip_invites (trip_id, code, role, created_by, expires_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TripInvite>(&query)
            .bind(trip_id)
            .bind(code)
            .bind(role.as_str())
            .bind(created_by)
            .bind(expires_at)
            .fetch_one(pool)
            .await
    }

    /// Find an invite by its code.
    pub async fn find_by_code(pool: &PgPool, code: &str) -> Result<Option<TripInvite>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM trip_invites WHERE code = $1");
        sqlx::query_as::<_, TripInvite>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    /// Claim an unused, unexpired invite for `user_id` and grant its role.
    ///
    /// An existing member keeps whichever of their current role and the
    /// invite's role ranks higher. Returns `None` (and changes nothing) if
    /// the invite is missing, already used, or expired.
    pub async fn accept(
        pool: &PgPool,
        code: &str,
        user_id: DbId,
    ) -> Result<Option<TripMember>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let claim = format!(
            "UPDATE trip_invites SET accepted_by = $2, accepted_at = NOW()
             WHERE code = $1
               AND accepted_by IS NULL
               AND (expires_at IS NULL OR expires_at > NOW())
             RETURNING {COLUMNS}"
        );
        let Some(invite) = sqlx::query_as::<_, TripInvite>(&claim)
            .bind(code)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            tx.rollback().await?;
            return Ok(None);
        };

        let granted = invite
            .role
            .parse::<Role>()
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

        let find = format!(
            "SELECT {MEMBER_COLUMNS} FROM trip_members
             WHERE trip_id = $1 AND user_id = $2
             FOR UPDATE"
        );
        let existing = sqlx::query_as::<_, TripMember>(&find)
            .bind(invite.trip_id)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;

        let member = match existing {
            None => {
                let insert = format!(
                    "INSERT INTO trip_members (trip_id, user_id, role)
                     VALUES ($1, $2, $3)
                     RETURNING {MEMBER_COLUMNS}"
                );
                sqlx::query_as::<_, TripMember>(&insert)
                    .bind(invite.trip_id)
                    .bind(user_id)
                    .bind(granted.as_str())
                    .fetch_one(&mut *tx)
                    .await?
            }
            Some(current) => {
                let keeps_current = current
                    .role
                    .parse::<Role>()
                    .is_ok_and(|role| role.satisfies(granted));
                if keeps_current {
                    current
                } else {
                    let upgrade = format!(
                        "UPDATE trip_members SET role = $2 WHERE id = $1 RETURNING {MEMBER_COLUMNS}"
                    );
                    sqlx::query_as::<_, TripMember>(&upgrade)
                        .bind(current.id)
                        .bind(granted.as_str())
                        .fetch_one(&mut *tx)
                        .await?
                }
            }
        };

        tx.commit().await?;
        Ok(Some(member))
    }
}
