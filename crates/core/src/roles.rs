//! Trip membership roles.
//!
//! Role names must match the `CHECK` constraint on `trip_members.role` in
//! `20260301000002_create_trips_and_members.sql`. Ordering is defined by an
//! explicit rank table, never by comparing the names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const ROLE_VIEWER: &str = "viewer";
pub const ROLE_EDITOR: &str = "editor";
pub const ROLE_OWNER: &str = "owner";

/// All valid role names, lowest rank first.
pub const VALID_ROLES: &[&str] = &[ROLE_VIEWER, ROLE_EDITOR, ROLE_OWNER];

/// A member's role within a single trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Viewer,
    Editor,
    Owner,
}

impl Role {
    /// Position of the role in the permission order. Higher outranks lower.
    pub const fn rank(self) -> u8 {
        match self {
            Role::Viewer => 1,
            Role::Editor => 2,
            Role::Owner => 3,
        }
    }

    /// `true` if this role meets or exceeds `required`.
    pub const fn satisfies(self, required: Role) -> bool {
        self.rank() >= required.rank()
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Viewer => ROLE_VIEWER,
            Role::Editor => ROLE_EDITOR,
            Role::Owner => ROLE_OWNER,
        }
    }

    /// Roles that may be granted through an invite. Ownership is never
    /// handed out this way.
    pub const fn is_invitable(self) -> bool {
        matches!(self, Role::Viewer | Role::Editor)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_VIEWER => Ok(Role::Viewer),
            ROLE_EDITOR => Ok(Role::Editor),
            ROLE_OWNER => Ok(Role::Owner),
            other => Err(CoreError::Validation(format!(
                "Invalid role '{other}'. Must be one of: {}",
                VALID_ROLES.join(", ")
            ))),
        }
    }
}
