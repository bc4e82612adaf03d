//! # agentmart-database
//!
//! PostgreSQL connection management, the transactional listing store used by
//! the review state machine (PostgreSQL and in-memory backends), and plain
//! repositories for read-side queries and the audit log.

pub mod connection;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::{ListingStore, ListingTransaction, MemoryListingStore, PgListingStore};
