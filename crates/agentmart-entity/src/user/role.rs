//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Marketplace roles, as asserted by the upstream gateway.
///
/// Roles are ordered by privilege level: Admin > Staff > Seller > Buyer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Platform administrator.
    Admin,
    /// Platform staff; reviews submissions.
    Staff,
    /// Lists agents for sale.
    Seller,
    /// Browses and purchases agents.
    Buyer,
}

impl UserRole {
    /// Return the privilege level (higher = more privileged).
    pub fn privilege_level(&self) -> u8 {
        match self {
            Self::Admin => 4,
            Self::Staff => 3,
            Self::Seller => 2,
            Self::Buyer => 1,
        }
    }

    /// Check if this role has at least the given role's privileges.
    pub fn has_at_least(&self, other: &UserRole) -> bool {
        self.privilege_level() >= other.privilege_level()
    }

    /// Check if this role belongs to platform staff.
    pub fn is_staff(&self) -> bool {
        self.has_at_least(&Self::Staff)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Staff => "staff",
            Self::Seller => "seller",
            Self::Buyer => "buyer",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = agentmart_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "staff" => Ok(Self::Staff),
            "seller" => Ok(Self::Seller),
            "buyer" => Ok(Self::Buyer),
            _ => Err(agentmart_core::AppError::validation(format!(
                "Invalid user role: '{s}'. Expected one of: admin, staff, seller, buyer"
            ))),
        }
    }
}
