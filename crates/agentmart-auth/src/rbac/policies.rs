//! Role-to-permission mapping definitions.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use agentmart_entity::user::UserRole;

/// A marketplace-level permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketPermission {
    // Seller operations
    /// Create new listings.
    ListingCreate,
    /// Edit and submit own listings for review.
    ListingSubmit,
    /// Spawn a pending update of an own live listing.
    ListingRequestUpdate,

    // Staff operations
    /// Approve or reject listings under review.
    ListingReview,
    /// Read any listing regardless of owner or status.
    ListingViewAll,

    // Maintenance
    /// Run the read-only consistency scan.
    ConsistencyScan,
    /// Apply consistency repairs.
    ConsistencyRepair,
}

impl fmt::Display for MarketPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ListingCreate => "listing_create",
            Self::ListingSubmit => "listing_submit",
            Self::ListingRequestUpdate => "listing_request_update",
            Self::ListingReview => "listing_review",
            Self::ListingViewAll => "listing_view_all",
            Self::ConsistencyScan => "consistency_scan",
            Self::ConsistencyRepair => "consistency_repair",
        };
        f.write_str(name)
    }
}

/// Defines the mapping from each role to its set of allowed permissions.
#[derive(Debug, Clone)]
pub struct RbacPolicies {
    policies: HashMap<UserRole, HashSet<MarketPermission>>,
}

impl RbacPolicies {
    /// Creates the default policy set.
    pub fn new() -> Self {
        use MarketPermission::*;

        let mut policies = HashMap::new();

        // Buyers browse the public catalog only.
        policies.insert(UserRole::Buyer, HashSet::new());

        let seller: HashSet<_> = [ListingCreate, ListingSubmit, ListingRequestUpdate]
            .into_iter()
            .collect();
        policies.insert(UserRole::Seller, seller);

        let staff: HashSet<_> = [ListingReview, ListingViewAll, ConsistencyScan]
            .into_iter()
            .collect();
        policies.insert(UserRole::Staff, staff);

        let admin: HashSet<_> = [
            ListingCreate,
            ListingSubmit,
            ListingRequestUpdate,
            ListingReview,
            ListingViewAll,
            ConsistencyScan,
            ConsistencyRepair,
        ]
        .into_iter()
        .collect();
        policies.insert(UserRole::Admin, admin);

        Self { policies }
    }

    /// Returns the set of permissions for the given role.
    pub fn permissions_for_role(&self, role: &UserRole) -> HashSet<MarketPermission> {
        self.policies.get(role).cloned().unwrap_or_default()
    }

    /// Checks whether the given role has the specified permission.
    pub fn has_permission(&self, role: &UserRole, permission: &MarketPermission) -> bool {
        self.policies
            .get(role)
            .is_some_and(|perms| perms.contains(permission))
    }
}

impl Default for RbacPolicies {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buyer_has_no_permissions() {
        let policies = RbacPolicies::new();
        assert!(policies.permissions_for_role(&UserRole::Buyer).is_empty());
    }

    #[test]
    fn test_staff_cannot_sell_or_repair() {
        let policies = RbacPolicies::new();
        assert!(policies.has_permission(&UserRole::Staff, &MarketPermission::ListingReview));
        assert!(!policies.has_permission(&UserRole::Staff, &MarketPermission::ListingCreate));
        assert!(!policies.has_permission(&UserRole::Staff, &MarketPermission::ConsistencyRepair));
    }

    #[test]
    fn test_seller_cannot_review() {
        let policies = RbacPolicies::new();
        assert!(policies.has_permission(&UserRole::Seller, &MarketPermission::ListingSubmit));
        assert!(!policies.has_permission(&UserRole::Seller, &MarketPermission::ListingReview));
    }

    #[test]
    fn test_admin_has_everything() {
        let policies = RbacPolicies::new();
        assert_eq!(policies.permissions_for_role(&UserRole::Admin).len(), 7);
    }
}
