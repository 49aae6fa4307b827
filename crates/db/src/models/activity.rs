//! Activity model and DTOs.
//!
//! An activity belongs to one trip and optionally one day. `day_id = None`
//! places it in the trip's unscheduled pool. Its `order_index` is compared
//! only against activities in the same scope (see [`Activity::scope`]).

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tripboard_core::ordering::ScopeKey;
use tripboard_core::places::PlaceCandidate;
use tripboard_core::types::{DbId, Timestamp};
use validator::Validate;

/// A row from the `activities` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Activity {
    pub id: DbId,
    pub trip_id: DbId,
    pub day_id: Option<DbId>,
    pub title: String,
    pub notes: Option<String>,
    pub starts_at: Option<Timestamp>,
    pub location_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub external_place_id: Option<String>,
    pub place_provider: Option<String>,
    pub place_id: Option<DbId>,
    pub order_index: f64,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Activity {
    pub fn scope(&self) -> ScopeKey {
        ScopeKey::for_activity(self.trip_id, self.day_id)
    }

    /// The stored location as a place candidate, if it has a name and
    /// coordinates.
    pub fn place_candidate(&self) -> Option<PlaceCandidate> {
        Some(PlaceCandidate {
            name: self.location_name.clone()?,
            latitude: self.latitude?,
            longitude: self.longitude?,
            address: self.address.clone(),
            external_id: self.external_place_id.clone(),
            provider: self.place_provider.clone(),
        })
    }
}

/// A location reference as submitted by clients, either picked from a map
/// provider (with `external_id` + `provider`) or entered by hand.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ActivityLocation {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    #[validate(length(max = 500))]
    pub address: Option<String>,
    #[validate(length(max = 200))]
    pub external_id: Option<String>,
    #[validate(length(max = 50))]
    pub provider: Option<String>,
}

impl From<&ActivityLocation> for PlaceCandidate {
    fn from(location: &ActivityLocation) -> Self {
        PlaceCandidate {
            name: location.name.clone(),
            latitude: location.latitude,
            longitude: location.longitude,
            address: location.address.clone(),
            external_id: location.external_id.clone(),
            provider: location.provider.clone(),
        }
    }
}

/// DTO for creating an activity. It is appended to the end of its scope.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateActivity {
    /// Day to schedule on; omit for the unscheduled pool.
    pub day_id: Option<DbId>,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 5000))]
    pub notes: Option<String>,
    pub starts_at: Option<Timestamp>,
    #[validate(nested)]
    pub location: Option<ActivityLocation>,
}

/// DTO for updating an activity's content. Scope and position change only
/// through the move and reorder endpoints.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateActivity {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 5000))]
    pub notes: Option<String>,
    pub starts_at: Option<Timestamp>,
    #[validate(nested)]
    pub location: Option<ActivityLocation>,
}
