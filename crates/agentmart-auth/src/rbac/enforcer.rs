//! RBAC enforcement: checks whether a role holds a required permission.

use tracing::debug;

use agentmart_core::error::AppError;
use agentmart_entity::user::UserRole;

use super::policies::{MarketPermission, RbacPolicies};

/// Enforces role-based access control for marketplace operations.
#[derive(Debug, Clone, Default)]
pub struct RbacEnforcer {
    policies: RbacPolicies,
}

impl RbacEnforcer {
    /// Creates a new enforcer with the default policy set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an enforcer with custom policies.
    pub fn with_policies(policies: RbacPolicies) -> Self {
        Self { policies }
    }

    /// Returns `Ok(())` if `role` holds `permission`, an authorization error otherwise.
    pub fn require_permission(
        &self,
        role: &UserRole,
        permission: &MarketPermission,
    ) -> Result<(), AppError> {
        if self.policies.has_permission(role, permission) {
            Ok(())
        } else {
            debug!(role = %role, permission = %permission, "Permission denied");
            Err(AppError::authorization(format!(
                "Role '{role}' does not have permission '{permission}'"
            )))
        }
    }

    /// Checks whether the role has the required permission (returns bool).
    pub fn has_permission(&self, role: &UserRole, permission: &MarketPermission) -> bool {
        self.policies.has_permission(role, permission)
    }

    /// Returns a reference to the underlying policies.
    pub fn policies(&self) -> &RbacPolicies {
        &self.policies
    }
}
