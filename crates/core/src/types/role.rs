//! User roles.

use serde::{Deserialize, Serialize};

/// Account role, fixed at registration.
///
/// Roles are a closed set: customers browse and place orders, store owners
/// additionally manage their own stores, products, and incoming orders.
/// Stored as TEXT in Postgres and parsed back through [`std::str::FromStr`],
/// so an unknown value in the database surfaces as a data-corruption error
/// instead of silently granting or denying access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Browses stores and products, places orders.
    #[default]
    Customer,
    /// Owns stores; manages their products and incoming orders.
    StoreOwner,
}

impl Role {
    /// The wire/database representation of this role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::StoreOwner => "store_owner",
        }
    }

    /// Whether this role may own stores.
    #[must_use]
    pub const fn is_store_owner(self) -> bool {
        matches!(self, Self::StoreOwner)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "store_owner" => Ok(Self::StoreOwner),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}
