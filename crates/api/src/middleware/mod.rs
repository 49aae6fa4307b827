//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`access::require_role`] -- Checks the caller's role in the trip owning a resource.

pub mod access;
pub mod auth;
