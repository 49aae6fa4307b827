//! Postgres implementations of the core store traits.
//!
//! [`PgStore`] is a thin handle over the pool. Each trait method is one
//! statement; nothing here holds a transaction across calls.

use async_trait::async_trait;
use sqlx::PgPool;
use tripboard_core::access::{Membership, MembershipStore, ResourceRef};
use tripboard_core::ordering::{OrderStore, OrderedItem, ScopeKey};
use tripboard_core::places::{PlaceCandidate, PlaceStore, PlaceSummary};
use tripboard_core::types::DbId;

use crate::models::member::TripMember;
use crate::repositories::{MemberRepo, PlaceRepo};

/// Store handle passed to the core resolvers.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Access control
// ---------------------------------------------------------------------------

#[async_trait]
impl MembershipStore for PgStore {
    type Error = sqlx::Error;

    async fn resolve_owning_trip(&self, resource: ResourceRef) -> Result<Option<DbId>, Self::Error> {
        let query = match resource {
            ResourceRef::Trip(_) => "SELECT id FROM trips WHERE id = $1",
            ResourceRef::Day(_) => "SELECT trip_id FROM days WHERE id = $1",
            ResourceRef::Activity(_) => "SELECT trip_id FROM activities WHERE id = $1",
            ResourceRef::Comment(_) => {
                "SELECT a.trip_id FROM comments c
                 JOIN activities a ON a.id = c.activity_id
                 WHERE c.id = $1"
            }
        };
        sqlx::query_scalar(query)
            .bind(resource.id())
            .fetch_optional(&self.pool)
            .await
    }

    async fn find_membership(
        &self,
        trip_id: DbId,
        user_id: DbId,
    ) -> Result<Option<Membership>, Self::Error> {
        MemberRepo::find(&self.pool, trip_id, user_id)
            .await?
            .as_ref()
            .map(TripMember::membership)
            .transpose()
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))
    }
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

/// Table, row filter and bound id selecting the rows of one scope.
fn scope_rows(scope: ScopeKey) -> (&'static str, &'static str, DbId) {
    match scope {
        ScopeKey::Itinerary { trip_id } => ("days", "trip_id = $1", trip_id),
        ScopeKey::Day { day_id } => ("activities", "day_id = $1", day_id),
        ScopeKey::Unscheduled { trip_id } => {
            ("activities", "trip_id = $1 AND day_id IS NULL", trip_id)
        }
    }
}

#[async_trait]
impl OrderStore for PgStore {
    type Error = sqlx::Error;

    async fn locate(&self, scope: ScopeKey, id: DbId) -> Result<Option<OrderedItem>, Self::Error> {
        if scope.holds_activities() {
            let row: Option<(DbId, Option<DbId>, f64)> = sqlx::query_as(
                "SELECT trip_id, day_id, order_index FROM activities WHERE id = $1",
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
            Ok(row.map(|(trip_id, day_id, order_index)| OrderedItem {
                id,
                scope: ScopeKey::for_activity(trip_id, day_id),
                order_index,
            }))
        } else {
            let row: Option<(DbId, f64)> =
                sqlx::query_as("SELECT trip_id, order_index FROM days WHERE id = $1")
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await?;
            Ok(row.map(|(trip_id, order_index)| OrderedItem {
                id,
                scope: ScopeKey::Itinerary { trip_id },
                order_index,
            }))
        }
    }

    async fn max_index(&self, scope: ScopeKey) -> Result<Option<f64>, Self::Error> {
        let (table, filter, key) = scope_rows(scope);
        let query = format!("SELECT MAX(order_index) FROM {table} WHERE {filter}");
        sqlx::query_scalar(&query)
            .bind(key)
            .fetch_one(&self.pool)
            .await
    }

    async fn renumber(&self, scope: ScopeKey, gap: f64) -> Result<Vec<(DbId, f64)>, Self::Error> {
        let (table, filter, key) = scope_rows(scope);
        let query = format!(
            "WITH ranked AS (
                 SELECT id, ROW_NUMBER() OVER (ORDER BY order_index, id) AS pos
                 FROM {table} WHERE {filter}
             )
             UPDATE {table} t SET order_index = ranked.pos * $2
             FROM ranked
             WHERE t.id = ranked.id
             RETURNING t.id, t.order_index"
        );
        let mut rows: Vec<(DbId, f64)> = sqlx::query_as(&query)
            .bind(key)
            .bind(gap)
            .fetch_all(&self.pool)
            .await?;
        rows.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        Ok(rows)
    }
}

// ---------------------------------------------------------------------------
// Places
// ---------------------------------------------------------------------------

#[async_trait]
impl PlaceStore for PgStore {
    type Error = sqlx::Error;

    async fn find_by_external_id(
        &self,
        external_id: &str,
        provider: &str,
    ) -> Result<Option<DbId>, Self::Error> {
        PlaceRepo::find_by_external_id(&self.pool, external_id, provider).await
    }

    async fn find_nearby_by_name(
        &self,
        name: &str,
        latitude: f64,
        longitude: f64,
        window: f64,
    ) -> Result<Vec<PlaceSummary>, Self::Error> {
        let places =
            PlaceRepo::find_nearby_by_name(&self.pool, name, latitude, longitude, window).await?;
        Ok(places.into_iter().map(PlaceSummary::from).collect())
    }

    async fn insert(&self, candidate: &PlaceCandidate) -> Result<DbId, Self::Error> {
        PlaceRepo::insert(&self.pool, candidate).await
    }
}
