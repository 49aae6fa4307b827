//! Repository for the `activities` table.
//!
//! Position changes go through [`ActivityRepo::move_to`] and
//! [`ActivityRepo::set_order_index`]; indices are computed by the ordering
//! engine beforehand.

use sqlx::PgPool;
use tripboard_core::types::DbId;

use crate::models::activity::{Activity, ActivityLocation, CreateActivity, UpdateActivity};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, trip_id, day_id, title, notes, starts_at, location_name, latitude, \
                       longitude, address, external_place_id, place_provider, place_id, \
                       order_index, created_by, created_at, updated_at";

/// Provides CRUD and positioning operations for activities.
pub struct ActivityRepo;

impl ActivityRepo {
    /// Insert a new activity at `order_index` in the scope named by
    /// `input.day_id`, returning the created row.
    pub async fn create(
        pool: &PgPool,
        trip_id: DbId,
        created_by: DbId,
        input: &CreateActivity,
        order_index: f64,
        place_id: Option<DbId>,
    ) -> Result<Activity, sqlx::Error> {
        let location = input.location.as_ref();
        let query = format!(
            "INSERT INTO activities
                (trip_id, day_id, title, notes, starts_at, location_name, latitude, longitude,
                 address, external_place_id, place_provider, place_id, order_index, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Activity>(&query)
            .bind(trip_id)
            .bind(input.day_id)
            .bind(&input.title)
            .bind(&input.notes)
            .bind(input.starts_at)
            .bind(location.map(|l| l.name.trim()))
            .bind(location.map(|l| l.latitude))
            .bind(location.map(|l| l.longitude))
            .bind(location.and_then(|l| l.address.as_deref()))
            .bind(location.and_then(|l| l.external_id.as_deref()))
            .bind(location.and_then(|l| l.provider.as_deref()))
            .bind(place_id)
            .bind(order_index)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Find an activity by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Activity>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM activities WHERE id = $1");
        sqlx::query_as::<_, Activity>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List every activity of a trip: scheduled ones grouped by day, then the
    /// unscheduled pool, each group in scope order.
    pub async fn list_for_trip(pool: &PgPool, trip_id: DbId) -> Result<Vec<Activity>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM activities
             WHERE trip_id = $1
             ORDER BY day_id ASC NULLS LAST, order_index ASC, id ASC"
        );
        sqlx::query_as::<_, Activity>(&query)
            .bind(trip_id)
            .fetch_all(pool)
            .await
    }

    /// Update an activity's content. Only non-`None` fields are applied.
    ///
    /// When `location` is given, every location column is replaced and the
    /// resolved `place_id` stored alongside.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateActivity,
        location: Option<(&ActivityLocation, DbId)>,
    ) -> Result<Option<Activity>, sqlx::Error> {
        let query = format!(
            "UPDATE activities SET
                title = COALESCE($2, title),
                notes = COALESCE($3, notes),
                starts_at = COALESCE($4, starts_at),
                location_name = CASE WHEN $5 THEN $6 ELSE location_name END,
                latitude = CASE WHEN $5 THEN $7 ELSE latitude END,
                longitude = CASE WHEN $5 THEN $8 ELSE longitude END,
                address = CASE WHEN $5 THEN $9 ELSE address END,
                external_place_id = CASE WHEN $5 THEN $10 ELSE external_place_id END,
                place_provider = CASE WHEN $5 THEN $11 ELSE place_provider END,
                place_id = CASE WHEN $5 THEN $12 ELSE place_id END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let loc = location.map(|(l, _)| l);
        sqlx::query_as::<_, Activity>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.notes)
            .bind(input.starts_at)
            .bind(location.is_some())
            .bind(loc.map(|l| l.name.trim()))
            .bind(loc.map(|l| l.latitude))
            .bind(loc.map(|l| l.longitude))
            .bind(loc.and_then(|l| l.address.as_deref()))
            .bind(loc.and_then(|l| l.external_id.as_deref()))
            .bind(loc.and_then(|l| l.provider.as_deref()))
            .bind(location.map(|(_, place_id)| place_id))
            .fetch_optional(pool)
            .await
    }

    /// Reassign an activity to another scope (`day_id = None` for the pool)
    /// at `order_index`.
    pub async fn move_to(
        pool: &PgPool,
        id: DbId,
        day_id: Option<DbId>,
        order_index: f64,
    ) -> Result<Option<Activity>, sqlx::Error> {
        let query = format!(
            "UPDATE activities SET day_id = $2, order_index = $3 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Activity>(&query)
            .bind(id)
            .bind(day_id)
            .bind(order_index)
            .fetch_optional(pool)
            .await
    }

    /// Change an activity's position within its current scope.
    pub async fn set_order_index(
        pool: &PgPool,
        id: DbId,
        order_index: f64,
    ) -> Result<Option<Activity>, sqlx::Error> {
        let query =
            format!("UPDATE activities SET order_index = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Activity>(&query)
            .bind(id)
            .bind(order_index)
            .fetch_optional(pool)
            .await
    }

    /// Record the canonical place resolved for an activity's location.
    pub async fn set_place(pool: &PgPool, id: DbId, place_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE activities SET place_id = $2 WHERE id = $1")
            .bind(id)
            .bind(place_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Delete an activity. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM activities WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
