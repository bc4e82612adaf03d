//! Seller-facing listing operations and the read side.

pub mod lineage;
pub mod service;

pub use lineage::Lineage;
pub use service::ListingService;
