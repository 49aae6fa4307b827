//! Repository for the `days` table.

use sqlx::PgPool;
use tripboard_core::ordering::GAP;
use tripboard_core::types::DbId;

use crate::models::day::{CreateDay, Day, UpdateDay};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, trip_id, title, date, order_index, created_at, updated_at";

/// Provides CRUD operations for itinerary days.
pub struct DayRepo;

impl DayRepo {
    /// Insert a new day at `order_index`, returning the created row.
    pub async fn create(
        pool: &PgPool,
        trip_id: DbId,
        input: &CreateDay,
        order_index: f64,
    ) -> Result<Day, sqlx::Error> {
        let query = format!(
            "INSERT INTO days (trip_id, title, date, order_index)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Day>(&query)
            .bind(trip_id)
            .bind(&input.title)
            .bind(input.date)
            .bind(order_index)
            .fetch_one(pool)
            .await
    }

    /// Find a day by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Day>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM days WHERE id = $1");
        sqlx::query_as::<_, Day>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a trip's days in itinerary order.
    pub async fn list_for_trip(pool: &PgPool, trip_id: DbId) -> Result<Vec<Day>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM days WHERE trip_id = $1 ORDER BY order_index ASC, id ASC"
        );
        sqlx::query_as::<_, Day>(&query)
            .bind(trip_id)
            .fetch_all(pool)
            .await
    }

    /// Update a day. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateDay,
    ) -> Result<Option<Day>, sqlx::Error> {
        let query = format!(
            "UPDATE days SET
                title = COALESCE($2, title),
                date = COALESCE($3, date)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Day>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(input.date)
            .fetch_optional(pool)
            .await
    }

    /// Move a day to a new position within its trip.
    pub async fn set_order_index(
        pool: &PgPool,
        id: DbId,
        order_index: f64,
    ) -> Result<Option<Day>, sqlx::Error> {
        let query = format!("UPDATE days SET order_index = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Day>(&query)
            .bind(id)
            .bind(order_index)
            .fetch_optional(pool)
            .await
    }

    /// Delete a day, first releasing its activities to the end of the trip's
    /// unscheduled pool in their current order.
    ///
    /// Returns `true` if the day was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let trip_id: Option<DbId> =
            sqlx::query_scalar("SELECT trip_id FROM days WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(trip_id) = trip_id else {
            tx.rollback().await?;
            return Ok(false);
        };

        let released = sqlx::query(
            "WITH base AS (
                 SELECT COALESCE(MAX(order_index), 0) AS max_index
                 FROM activities WHERE trip_id = $2 AND day_id IS NULL
             ),
             ranked AS (
                 SELECT id, ROW_NUMBER() OVER (ORDER BY order_index, id) AS pos
                 FROM activities WHERE day_id = $1
             )
             UPDATE activities a
             SET day_id = NULL, order_index = base.max_index + ranked.pos * $3
             FROM base, ranked
             WHERE a.id = ranked.id",
        )
        .bind(id)
        .bind(trip_id)
        .bind(GAP)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        sqlx::query("DELETE FROM days WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::debug!(day_id = id, trip_id, released, "Day deleted, activities moved to pool");
        Ok(true)
    }
}
