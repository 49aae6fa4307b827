//! Repository for the `trips` table.

use sqlx::PgPool;
use tripboard_core::roles::ROLE_OWNER;
use tripboard_core::types::DbId;

use crate::models::trip::{CreateTrip, Trip, TripWithRole, UpdateTrip};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, title, description, start_date, end_date, owner_id, created_at, updated_at";

/// Provides CRUD operations for trips.
pub struct TripRepo;

impl TripRepo {
    /// Insert a new trip and its owner membership in one transaction.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateTrip,
    ) -> Result<Trip, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO trips (title, description, start_date, end_date, owner_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let trip = sqlx::query_as::<_, Trip>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(owner_id)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO trip_members (trip_id, user_id, role) VALUES ($1, $2, $3)")
            .bind(trip.id)
            .bind(owner_id)
            .bind(ROLE_OWNER)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(trip)
    }

    /// Find a trip by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Trip>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM trips WHERE id = $1");
        sqlx::query_as::<_, Trip>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List every trip `user_id` is a member of, with their role, most
    /// recently created first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<TripWithRole>, sqlx::Error> {
        sqlx::query_as::<_, TripWithRole>(
            "SELECT t.id, t.title, t.description, t.start_date, t.end_date, t.owner_id,
                    t.created_at, t.updated_at, m.role
             FROM trips t
             JOIN trip_members m ON m.trip_id = t.id
             WHERE m.user_id = $1
             ORDER BY t.created_at DESC, t.id DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Update a trip. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTrip,
    ) -> Result<Option<Trip>, sqlx::Error> {
        let query = format!(
            "UPDATE trips SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                start_date = COALESCE($4, start_date),
                end_date = COALESCE($5, end_date)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Trip>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_optional(pool)
            .await
    }

    /// Delete a trip. Days, activities, comments, members and invites cascade.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM trips WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
