//! Fractional-index ordering engine.
//!
//! Reorderable collections (days within a trip, activities within a day or
//! within a trip's unscheduled pool) carry a sparse `f64` sort key. Fresh
//! items are spaced [`GAP`] apart; repositioning an item takes the midpoint
//! of its new neighbours, so a move rewrites exactly one row.
//!
//! Repeated bisection between the same neighbours eventually runs out of
//! floating-point precision. When a computed key is not strictly between
//! its neighbours the whole scope is renumbered to multiples of [`GAP`]
//! (current order preserved, ties broken by id) and the computation is
//! retried once. That retry cannot degenerate again, so callers never see
//! the renumber.
//!
//! Callers only deal with [`compute_insertion_index`]; the float
//! representation stays behind it and behind [`OrderStore`].

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;

use crate::types::DbId;

/// Spacing between freshly assigned indices.
pub const GAP: f64 = 1000.0;

// ---------------------------------------------------------------------------
// Scope keys
// ---------------------------------------------------------------------------

/// The grouping within which order indices are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKey {
    /// Days of a trip.
    Itinerary { trip_id: DbId },
    /// Activities assigned to a day.
    Day { day_id: DbId },
    /// Activities of a trip not assigned to any day.
    Unscheduled { trip_id: DbId },
}

impl ScopeKey {
    /// Scope of an activity, derived solely from its nullable `day_id`.
    pub const fn for_activity(trip_id: DbId, day_id: Option<DbId>) -> Self {
        match day_id {
            Some(day_id) => ScopeKey::Day { day_id },
            None => ScopeKey::Unscheduled { trip_id },
        }
    }

    /// `true` if this scope orders activities rather than days.
    pub const fn holds_activities(self) -> bool {
        !matches!(self, ScopeKey::Itinerary { .. })
    }
}

impl fmt::Display for ScopeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeKey::Itinerary { trip_id } => write!(f, "itinerary:{trip_id}"),
            ScopeKey::Day { day_id } => write!(f, "day:{day_id}"),
            ScopeKey::Unscheduled { trip_id } => write!(f, "unscheduled:{trip_id}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Store abstraction
// ---------------------------------------------------------------------------

/// An item's current position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderedItem {
    pub id: DbId,
    pub scope: ScopeKey,
    pub order_index: f64,
}

/// Range queries and bulk renumbering over one kind of ordered item.
#[async_trait]
pub trait OrderStore: Send + Sync {
    type Error: Send;

    /// Look up item `id` of the kind ordered by `scope` (a day for
    /// [`ScopeKey::Itinerary`], otherwise an activity). The returned item
    /// reports its own scope, which may differ from `scope`.
    async fn locate(&self, scope: ScopeKey, id: DbId) -> Result<Option<OrderedItem>, Self::Error>;

    /// Largest index currently used in `scope`, or `None` if it is empty.
    async fn max_index(&self, scope: ScopeKey) -> Result<Option<f64>, Self::Error>;

    /// Reassign every item in `scope` to `(position + 1) * gap`, where
    /// position follows `(order_index, id)` ascending. Must apply all rows
    /// or none. Returns the new `(id, order_index)` pairs in order.
    async fn renumber(&self, scope: ScopeKey, gap: f64) -> Result<Vec<(DbId, f64)>, Self::Error>;
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum OrderingError<E> {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Store error: {0}")]
    Store(E),
}

/// The computed index collapsed onto a neighbour. Never leaves this module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RenumberRequired;

// ---------------------------------------------------------------------------
// Pure index arithmetic
// ---------------------------------------------------------------------------

/// Index for a new item at the end of a scope whose largest index is `max`.
pub fn append_index(max: Option<f64>) -> f64 {
    match max {
        Some(max) => max + GAP,
        None => GAP,
    }
}

/// Index for an item placed between `after` (the item that should precede
/// it) and `before` (the item that should follow it).
pub fn index_between(after: Option<f64>, before: Option<f64>) -> f64 {
    match (after, before) {
        (Some(a), Some(b)) => (a + b) / 2.0,
        (Some(a), None) => a + GAP,
        (None, Some(b)) => b / 2.0,
        (None, None) => GAP,
    }
}

/// `true` if `index` sorts strictly after `after` and strictly before `before`.
pub fn is_strictly_between(index: f64, after: Option<f64>, before: Option<f64>) -> bool {
    index.is_finite()
        && after.map_or(true, |a| index > a)
        && before.map_or(true, |b| index < b)
}

fn checked_between(after: Option<f64>, before: Option<f64>) -> Result<f64, RenumberRequired> {
    let index = index_between(after, before);
    if is_strictly_between(index, after, before) {
        Ok(index)
    } else {
        Err(RenumberRequired)
    }
}

fn checked_append(max: Option<f64>) -> Result<f64, RenumberRequired> {
    let index = append_index(max);
    if is_strictly_between(index, max, None) {
        Ok(index)
    } else {
        Err(RenumberRequired)
    }
}

/// Evenly spaced indices for `items` in their current order.
///
/// Sorts by `(order_index, id)` so equal indices left behind by concurrent
/// writers are separated deterministically. Reference implementation of the
/// [`OrderStore::renumber`] contract.
pub fn renumbered(items: &[(DbId, f64)], gap: f64) -> Vec<(DbId, f64)> {
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
    sorted
        .into_iter()
        .enumerate()
        .map(|(pos, (id, _))| (id, (pos as f64 + 1.0) * gap))
        .collect()
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Compute the order index for an item entering `scope`.
///
/// - No anchors: append after the current maximum (or [`GAP`] when empty).
/// - `after_id` / `before_id`: place between those items, which must both
///   exist in `scope`.
///
/// Renumbers the scope and retries once if the key space between the
/// anchors is exhausted.
pub async fn compute_insertion_index<S>(
    store: &S,
    scope: ScopeKey,
    after_id: Option<DbId>,
    before_id: Option<DbId>,
) -> Result<f64, OrderingError<S::Error>>
where
    S: OrderStore + ?Sized,
{
    if after_id.is_none() && before_id.is_none() {
        return append(store, scope).await;
    }

    if after_id.is_some() && after_id == before_id {
        return Err(OrderingError::Validation(
            "after_id and before_id must refer to different items".into(),
        ));
    }

    let after = resolve_anchor(store, scope, after_id, "after_id").await?;
    let before = resolve_anchor(store, scope, before_id, "before_id").await?;

    if let (Some(a), Some(b)) = (after, before) {
        if read_order(&a, &b) == std::cmp::Ordering::Greater {
            return Err(inverted_anchors(a.id, b.id));
        }
    }

    let first = checked_between(
        after.map(|a| a.order_index),
        before.map(|b| b.order_index),
    );
    if let Ok(index) = first {
        return Ok(index);
    }

    let fresh = renumber(store, scope).await?;
    let after_index = reindexed(&fresh, after)?;
    let before_index = reindexed(&fresh, before)?;

    checked_between(after_index, before_index).map_err(|RenumberRequired| match (after, before) {
        // A concurrent writer moved an anchor between the two reads.
        (Some(a), Some(b)) => inverted_anchors(a.id, b.id),
        _ => OrderingError::Validation("anchor index is out of range".into()),
    })
}

/// Like [`compute_insertion_index`], for repositioning `item_id` itself.
///
/// Rejects anchors that name the item being moved.
pub async fn compute_reorder_index<S>(
    store: &S,
    scope: ScopeKey,
    item_id: DbId,
    after_id: Option<DbId>,
    before_id: Option<DbId>,
) -> Result<f64, OrderingError<S::Error>>
where
    S: OrderStore + ?Sized,
{
    if after_id == Some(item_id) || before_id == Some(item_id) {
        return Err(OrderingError::Validation(
            "An item cannot be anchored to itself".into(),
        ));
    }
    compute_insertion_index(store, scope, after_id, before_id).await
}

async fn append<S>(store: &S, scope: ScopeKey) -> Result<f64, OrderingError<S::Error>>
where
    S: OrderStore + ?Sized,
{
    let max = store.max_index(scope).await.map_err(OrderingError::Store)?;
    if let Ok(index) = checked_append(max) {
        return Ok(index);
    }

    let fresh = renumber(store, scope).await?;
    let max = fresh.last().map(|&(_, index)| index);
    checked_append(max)
        .map_err(|RenumberRequired| OrderingError::Validation("scope is too large to append".into()))
}

async fn resolve_anchor<S>(
    store: &S,
    scope: ScopeKey,
    id: Option<DbId>,
    field: &str,
) -> Result<Option<OrderedItem>, OrderingError<S::Error>>
where
    S: OrderStore + ?Sized,
{
    let Some(id) = id else {
        return Ok(None);
    };
    let item = store
        .locate(scope, id)
        .await
        .map_err(OrderingError::Store)?
        .ok_or_else(|| OrderingError::Validation(format!("{field} {id} does not exist")))?;
    if item.scope != scope {
        return Err(OrderingError::Validation(format!(
            "{field} {id} belongs to {}, not {scope}",
            item.scope
        )));
    }
    Ok(Some(item))
}

async fn renumber<S>(store: &S, scope: ScopeKey) -> Result<Vec<(DbId, f64)>, OrderingError<S::Error>>
where
    S: OrderStore + ?Sized,
{
    let fresh = store
        .renumber(scope, GAP)
        .await
        .map_err(OrderingError::Store)?;
    tracing::info!(%scope, items = fresh.len(), "Order index space exhausted, renumbered scope");
    Ok(fresh)
}

fn reindexed<E>(
    fresh: &[(DbId, f64)],
    anchor: Option<OrderedItem>,
) -> Result<Option<f64>, OrderingError<E>> {
    let Some(anchor) = anchor else {
        return Ok(None);
    };
    let by_id: HashMap<DbId, f64> = fresh.iter().copied().collect();
    by_id
        .get(&anchor.id)
        .copied()
        .map(Some)
        .ok_or_else(|| {
            OrderingError::Validation(format!("anchor {} left the scope during reorder", anchor.id))
        })
}

/// Position of two items in read order: by index, ties broken by id.
fn read_order(a: &OrderedItem, b: &OrderedItem) -> std::cmp::Ordering {
    a.order_index
        .total_cmp(&b.order_index)
        .then(a.id.cmp(&b.id))
}

fn inverted_anchors<E>(after_id: DbId, before_id: DbId) -> OrderingError<E> {
    OrderingError::Validation(format!(
        "after_id {after_id} does not sort before before_id {before_id}"
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
