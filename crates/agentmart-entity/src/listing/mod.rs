//! Listing (agent) domain entities: the versioned marketplace entity.

pub mod model;
pub mod pricing;
pub mod slug;
pub mod status;

pub use model::{Listing, ListingContent};
pub use pricing::PricingModel;
pub use status::ListingStatus;
