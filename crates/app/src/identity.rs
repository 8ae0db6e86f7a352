//! Authenticated identity passed in by the upstream auth layer.
//!
//! Token issuance and verification happen outside this crate; requests
//! arrive with an already-verified user identifier and role.

use std::str::FromStr;

use thiserror::Error;

use crate::uuids::TypedUuid;

/// Marker for user identifiers.
pub struct User;

/// User UUID
pub type UserUuid = TypedUuid<User>;

/// Role attached to a verified identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Customer,
    Admin,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Admin => "admin",
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown role {0:?}")]
pub struct ParseRoleError(String);

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "admin" => Ok(Self::Admin),
            other => Err(ParseRoleError(other.to_string())),
        }
    }
}

/// Verified identity acting on a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user: UserUuid,
    pub role: Role,
}

impl Actor {
    #[must_use]
    pub const fn customer(user: UserUuid) -> Self {
        Self {
            user,
            role: Role::Customer,
        }
    }

    #[must_use]
    pub const fn admin(user: UserUuid) -> Self {
        Self {
            user,
            role: Role::Admin,
        }
    }

    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}
