//! Actor roles.

use serde::{Deserialize, Serialize};

/// Role of the calling actor.
///
/// The identity provider resolves the caller to exactly one of these; the
/// domain never widens or re-derives it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Submits orders, structures parts into assemblies, selects offers.
    Creator,
    /// Submits competing offers, drives production statuses.
    Manufacturer,
    /// May perform any guarded operation.
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Creator => "creator",
            Role::Manufacturer => "manufacturer",
            Role::Admin => "admin",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
