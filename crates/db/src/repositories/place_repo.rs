//! Repository for the `places` table and its social aggregates.

use sqlx::PgPool;
use tripboard_core::places::PlaceCandidate;
use tripboard_core::types::DbId;

use crate::models::place::{Place, PlaceStats};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, name, latitude, longitude, address, external_id, provider, created_at, updated_at";

/// Provides lookups and race-safe inserts for canonical places.
pub struct PlaceRepo;

impl PlaceRepo {
    /// Find a place by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Place>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM places WHERE id = $1");
        sqlx::query_as::<_, Place>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the place registered under a provider's identifier.
    pub async fn find_by_external_id(
        pool: &PgPool,
        external_id: &str,
        provider: &str,
    ) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM places WHERE external_id = $1 AND provider = $2")
            .bind(external_id)
            .bind(provider)
            .fetch_optional(pool)
            .await
    }

    /// Places named exactly `name` inside the open square of half-width
    /// `window` degrees around the given coordinates, oldest first.
    pub async fn find_nearby_by_name(
        pool: &PgPool,
        name: &str,
        latitude: f64,
        longitude: f64,
        window: f64,
    ) -> Result<Vec<Place>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM places
             WHERE name = $1
               AND latitude > $2 - $4 AND latitude < $2 + $4
               AND longitude > $3 - $4 AND longitude < $3 + $4
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, Place>(&query)
            .bind(name)
            .bind(latitude)
            .bind(longitude)
            .bind(window)
            .fetch_all(pool)
            .await
    }

    /// Insert a place from a candidate, storing the trimmed name.
    ///
    /// The `(external_id, provider)` pair is stored only when both halves are
    /// present. If a concurrent writer already inserted the same pair, the
    /// existing row's id is returned.
    pub async fn insert(pool: &PgPool, candidate: &PlaceCandidate) -> Result<DbId, sqlx::Error> {
        let key = candidate.provider_key();
        sqlx::query_scalar(
            "INSERT INTO places (name, latitude, longitude, address, external_id, provider)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT ON CONSTRAINT uq_places_external_provider
             DO UPDATE SET external_id = EXCLUDED.external_id
             RETURNING id",
        )
        .bind(candidate.name.trim())
        .bind(candidate.latitude)
        .bind(candidate.longitude)
        .bind(&candidate.address)
        .bind(key.map(|(external_id, _)| external_id))
        .bind(key.map(|(_, provider)| provider))
        .fetch_one(pool)
        .await
    }

    /// Check-in count, review count and average rating for a place.
    pub async fn stats(pool: &PgPool, place_id: DbId) -> Result<PlaceStats, sqlx::Error> {
        sqlx::query_as::<_, PlaceStats>(
            "SELECT
                (SELECT COUNT(*) FROM check_ins WHERE place_id = $1) AS check_in_count,
                (SELECT COUNT(*) FROM reviews WHERE place_id = $1) AS review_count,
                (SELECT AVG(rating)::float8 FROM reviews WHERE place_id = $1) AS average_rating",
        )
        .bind(place_id)
        .fetch_one(pool)
        .await
    }
}
