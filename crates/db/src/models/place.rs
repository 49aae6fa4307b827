//! Canonical place model and aggregate views.

use serde::Serialize;
use sqlx::FromRow;
use tripboard_core::places::PlaceSummary;
use tripboard_core::types::{DbId, Timestamp};

use super::review::ReviewWithAuthor;

/// A row from the `places` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Place {
    pub id: DbId,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub external_id: Option<String>,
    pub provider: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<Place> for PlaceSummary {
    fn from(place: Place) -> Self {
        PlaceSummary {
            id: place.id,
            name: place.name,
            latitude: place.latitude,
            longitude: place.longitude,
        }
    }
}

/// Social aggregates over one place.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PlaceStats {
    pub check_in_count: i64,
    pub review_count: i64,
    pub average_rating: Option<f64>,
}

/// Place detail response: the place, its aggregates and recent reviews.
#[derive(Debug, Clone, Serialize)]
pub struct PlaceDetail {
    #[serde(flatten)]
    pub place: Place,
    #[serde(flatten)]
    pub stats: PlaceStats,
    pub reviews: Vec<ReviewWithAuthor>,
}
