//! Hierarchical access resolution.
//!
//! No resource carries its own access-control list. Every nested resource
//! (day, activity, comment) inherits authorization from the trip that owns
//! it: resolve the owning trip, look up the caller's membership row, compare
//! ranks. All three steps live here so no handler re-implements them.
//!
//! Store access goes through [`MembershipStore`]; the Postgres implementation
//! lives in `tripboard_db::stores`.

use std::fmt;

use async_trait::async_trait;

use crate::roles::Role;
use crate::types::DbId;

/// A reference to any resource in the trip hierarchy.
///
/// Day and Activity are one hop from their trip; Comment is two hops
/// (comment -> activity -> trip).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceRef {
    Trip(DbId),
    Day(DbId),
    Activity(DbId),
    Comment(DbId),
}

impl ResourceRef {
    pub const fn id(self) -> DbId {
        match self {
            ResourceRef::Trip(id)
            | ResourceRef::Day(id)
            | ResourceRef::Activity(id)
            | ResourceRef::Comment(id) => id,
        }
    }

    /// Human-readable entity name used in `NotFound` errors.
    pub const fn entity(self) -> &'static str {
        match self {
            ResourceRef::Trip(_) => "Trip",
            ResourceRef::Day(_) => "Day",
            ResourceRef::Activity(_) => "Activity",
            ResourceRef::Comment(_) => "Comment",
        }
    }
}

/// A user's membership in one trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Membership {
    pub trip_id: DbId,
    pub user_id: DbId,
    pub role: Role,
}

/// Why an existing trip refused access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    NotMember,
    InsufficientRole { required: Role, actual: Role },
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Denial::NotMember => f.write_str("not a member of this trip"),
            Denial::InsufficientRole { required, actual } => write!(
                f,
                "insufficient role: {required} required, caller is {actual}"
            ),
        }
    }
}

/// Failure modes of [`check_access`].
///
/// `NotFound` and `Forbidden` are never conflated: clients show "this trip
/// no longer exists" and "ask to be invited" for them respectively.
#[derive(Debug, thiserror::Error)]
pub enum AccessError<E> {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Forbidden: {0}")]
    Forbidden(Denial),

    #[error("Store error: {0}")]
    Store(E),
}

/// Read access to the trip hierarchy and the membership table.
#[async_trait]
pub trait MembershipStore: Send + Sync {
    type Error: Send;

    /// Follow parent links from `resource` to its trip.
    ///
    /// Returns `None` if the resource, or any parent on the way, does not exist.
    async fn resolve_owning_trip(&self, resource: ResourceRef) -> Result<Option<DbId>, Self::Error>;

    /// Fetch the membership row for `(trip_id, user_id)`.
    async fn find_membership(
        &self,
        trip_id: DbId,
        user_id: DbId,
    ) -> Result<Option<Membership>, Self::Error>;
}

/// The single rank comparison every access check goes through.
pub fn authorize(membership: &Membership, required: Role) -> Result<(), Denial> {
    if membership.role.satisfies(required) {
        Ok(())
    } else {
        Err(Denial::InsufficientRole {
            required,
            actual: membership.role,
        })
    }
}

/// Resolve `resource` to its trip and check that `user_id` holds at least
/// `min_role` there. Returns the caller's membership on success.
pub async fn check_access<S>(
    store: &S,
    user_id: DbId,
    resource: ResourceRef,
    min_role: Role,
) -> Result<Membership, AccessError<S::Error>>
where
    S: MembershipStore + ?Sized,
{
    let trip_id = store
        .resolve_owning_trip(resource)
        .await
        .map_err(AccessError::Store)?
        .ok_or(AccessError::NotFound {
            entity: resource.entity(),
            id: resource.id(),
        })?;

    let membership = store
        .find_membership(trip_id, user_id)
        .await
        .map_err(AccessError::Store)?
        .ok_or_else(|| {
            tracing::debug!(user_id, trip_id, "Access denied: not a member");
            AccessError::Forbidden(Denial::NotMember)
        })?;

    authorize(&membership, min_role).map_err(|denial| {
        tracing::debug!(user_id, trip_id, %denial, "Access denied");
        AccessError::Forbidden(denial)
    })?;

    Ok(membership)
}
