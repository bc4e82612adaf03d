//! Per-listing access checks.

use uuid::Uuid;

use agentmart_core::error::AppError;
use agentmart_entity::listing::Listing;
use agentmart_entity::user::UserRole;

/// The relationship an actor has to a specific listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// The actor owns the listing.
    Owner,
    /// The actor is platform staff.
    Staff,
    /// The listing is live and visible to everyone.
    Public,
}

impl Capability {
    /// Resolve the strongest capability `actor_id` holds on `listing`, if any.
    pub fn resolve(actor_id: Uuid, role: UserRole, listing: &Listing) -> Option<Self> {
        if listing.is_owned_by(actor_id) {
            Some(Self::Owner)
        } else if role.is_staff() {
            Some(Self::Staff)
        } else if listing.is_public() {
            Some(Self::Public)
        } else {
            None
        }
    }

    /// Require read access to `listing`.
    ///
    /// Non-public listings are reported as missing to outsiders so their
    /// existence does not leak.
    pub fn authorize_read(
        actor_id: Uuid,
        role: UserRole,
        listing: &Listing,
    ) -> Result<Self, AppError> {
        Self::resolve(actor_id, role, listing)
            .ok_or_else(|| AppError::not_found(format!("Listing {} not found", listing.id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentmart_entity::listing::{ListingContent, ListingStatus, PricingModel};

    fn listing(owner: Uuid) -> Listing {
        Listing::new_draft(
            owner,
            "cap-test".to_string(),
            ListingContent {
                title: "Cap".to_string(),
                description: String::new(),
                category: None,
                tags: Vec::new(),
                price_cents: 0,
                currency: "USD".to_string(),
                pricing_model: PricingModel::Free,
                workflow: serde_json::Value::Null,
            },
        )
    }

    #[test]
    fn test_owner_wins_over_staff() {
        let owner = Uuid::new_v4();
        let l = listing(owner);
        assert_eq!(
            Capability::resolve(owner, UserRole::Admin, &l),
            Some(Capability::Owner)
        );
    }

    #[test]
    fn test_outsider_cannot_see_draft() {
        let l = listing(Uuid::new_v4());
        let err = Capability::authorize_read(Uuid::new_v4(), UserRole::Buyer, &l).unwrap_err();
        assert_eq!(err.kind, agentmart_core::error::ErrorKind::NotFound);
    }

    #[test]
    fn test_outsider_sees_live_listing() {
        let mut l = listing(Uuid::new_v4());
        l.status = ListingStatus::Approved;
        l.is_latest_version = true;
        assert_eq!(
            Capability::resolve(Uuid::new_v4(), UserRole::Buyer, &l),
            Some(Capability::Public)
        );
    }
}
