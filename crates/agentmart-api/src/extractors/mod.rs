//! Custom Axum extractors.

pub mod actor;
pub mod pagination;

pub use actor::ActorUser;
pub use pagination::PaginationParams;
