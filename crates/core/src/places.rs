//! Place identity resolution.
//!
//! Activities and check-ins carry location references created independently
//! by different users. [`resolve_place`] folds them into canonical place
//! rows so check-in counts and ratings aggregate over one record:
//!
//! 1. exact `(external_id, provider)` match, when both are supplied;
//! 2. exact name match within [`PROXIMITY_WINDOW_DEG`] on both axes;
//! 3. otherwise a new place is created.
//!
//! This is best-effort. Near-duplicate names or coordinates straddling the
//! window will not merge, so consumers must tolerate duplicate places.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::types::DbId;

/// Half-width of the proximity window in degrees (about 111m of latitude).
pub const PROXIMITY_WINDOW_DEG: f64 = 0.001;

pub const MAX_PLACE_NAME_LEN: usize = 200;

/// A location reference to resolve.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceCandidate {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub external_id: Option<String>,
    pub provider: Option<String>,
}

impl PlaceCandidate {
    /// The `(external_id, provider)` pair, only when both are present and
    /// non-blank.
    pub fn provider_key(&self) -> Option<(&str, &str)> {
        let external_id = self.external_id.as_deref().map(str::trim)?;
        let provider = self.provider.as_deref().map(str::trim)?;
        if external_id.is_empty() || provider.is_empty() {
            return None;
        }
        Some((external_id, provider))
    }
}

/// A stored place, as far as matching is concerned.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceSummary {
    pub id: DbId,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// How a candidate was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionOutcome {
    MatchedExternal,
    MatchedProximity,
    Created,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceResolution {
    pub place_id: DbId,
    pub outcome: ResolutionOutcome,
}

#[derive(Debug, thiserror::Error)]
pub enum PlaceError<E> {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Store error: {0}")]
    Store(E),
}

/// Lookups and inserts against the canonical place table.
#[async_trait]
pub trait PlaceStore: Send + Sync {
    type Error: Send;

    async fn find_by_external_id(
        &self,
        external_id: &str,
        provider: &str,
    ) -> Result<Option<DbId>, Self::Error>;

    /// Places named exactly `name` whose coordinates fall inside the square
    /// of half-width `window` around `(latitude, longitude)`, lowest id first.
    /// May over-approximate; results are re-checked with [`within_proximity`].
    async fn find_nearby_by_name(
        &self,
        name: &str,
        latitude: f64,
        longitude: f64,
        window: f64,
    ) -> Result<Vec<PlaceSummary>, Self::Error>;

    /// Insert a new place. When another writer inserted the same
    /// `(external_id, provider)` first, return that row's id instead.
    async fn insert(&self, candidate: &PlaceCandidate) -> Result<DbId, Self::Error>;
}

/// `true` if two coordinates differ by less than the window on both axes.
pub fn within_proximity(lat_a: f64, lng_a: f64, lat_b: f64, lng_b: f64) -> bool {
    (lat_a - lat_b).abs() < PROXIMITY_WINDOW_DEG && (lng_a - lng_b).abs() < PROXIMITY_WINDOW_DEG
}

/// Reject candidates that could never match or be stored meaningfully.
pub fn validate_candidate(candidate: &PlaceCandidate) -> Result<(), CoreError> {
    let name = candidate.name.trim();
    if name.is_empty() {
        return Err(CoreError::Validation("Place name must not be empty".into()));
    }
    if name.chars().count() > MAX_PLACE_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Place name must be at most {MAX_PLACE_NAME_LEN} characters"
        )));
    }
    if !candidate.latitude.is_finite() || !(-90.0..=90.0).contains(&candidate.latitude) {
        return Err(CoreError::Validation(format!(
            "Latitude must be between -90 and 90, got {}",
            candidate.latitude
        )));
    }
    if !candidate.longitude.is_finite() || !(-180.0..=180.0).contains(&candidate.longitude) {
        return Err(CoreError::Validation(format!(
            "Longitude must be between -180 and 180, got {}",
            candidate.longitude
        )));
    }
    Ok(())
}

/// Resolve `candidate` to a canonical place id, creating one if nothing matches.
pub async fn resolve_place<S>(
    store: &S,
    candidate: &PlaceCandidate,
) -> Result<PlaceResolution, PlaceError<S::Error>>
where
    S: PlaceStore + ?Sized,
{
    validate_candidate(candidate).map_err(|e| match e {
        CoreError::Validation(msg) => PlaceError::Validation(msg),
        other => PlaceError::Validation(other.to_string()),
    })?;

    if let Some((external_id, provider)) = candidate.provider_key() {
        if let Some(place_id) = store
            .find_by_external_id(external_id, provider)
            .await
            .map_err(PlaceError::Store)?
        {
            tracing::debug!(place_id, provider, "Place matched by external id");
            return Ok(PlaceResolution {
                place_id,
                outcome: ResolutionOutcome::MatchedExternal,
            });
        }
    }

    let name = candidate.name.trim();
    let nearby = store
        .find_nearby_by_name(
            name,
            candidate.latitude,
            candidate.longitude,
            PROXIMITY_WINDOW_DEG,
        )
        .await
        .map_err(PlaceError::Store)?;

    if let Some(existing) = nearby.iter().find(|place| {
        place.name == name
            && within_proximity(
                place.latitude,
                place.longitude,
                candidate.latitude,
                candidate.longitude,
            )
    }) {
        tracing::debug!(place_id = existing.id, name, "Place matched by proximity");
        return Ok(PlaceResolution {
            place_id: existing.id,
            outcome: ResolutionOutcome::MatchedProximity,
        });
    }

    let place_id = store.insert(candidate).await.map_err(PlaceError::Store)?;
    tracing::info!(place_id, name, "Created canonical place");
    Ok(PlaceResolution {
        place_id,
        outcome: ResolutionOutcome::Created,
    })
}
