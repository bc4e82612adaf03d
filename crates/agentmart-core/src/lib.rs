//! # agentmart-core
//!
//! Core crate for AgentMart. Contains configuration schemas, domain
//! events, pagination types, service traits, and the unified error system.
//!
//! This crate has **no** internal dependencies on other AgentMart crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
