//! Repository implementations for AgentMart entities.

pub mod audit;
pub mod listing;

pub use audit::AuditLogRepository;
pub use listing::ListingRepository;
