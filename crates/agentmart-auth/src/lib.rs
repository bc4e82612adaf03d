//! # agentmart-auth
//!
//! Authorization for AgentMart. Identity is asserted upstream; this crate
//! only decides what an identified actor may do.
//!
//! ## Modules
//!
//! - `rbac`: role to marketplace permission mapping and enforcement
//! - `capability`: ownership and staff checks on individual listings

pub mod capability;
pub mod rbac;

pub use capability::Capability;
pub use rbac::{MarketPermission, RbacEnforcer, RbacPolicies};
