//! Shared domain types.

use serde::{Deserialize, Serialize};

/// Account role, stored as TEXT in `users.role`.
///
/// The role is fixed at signup and drives the capability mapping in
/// `common::auth` - it is not a per-resource ACL.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Customer,
    Investigator,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Customer => write!(f, "customer"),
            Role::Investigator => write!(f, "investigator"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "customer" => Ok(Role::Customer),
            "investigator" => Ok(Role::Investigator),
            "admin" => Ok(Role::Admin),
            _ => Err(anyhow::anyhow!("Invalid role: {}", s)),
        }
    }
}
