//! Core traits defined in `agentmart-core` and implemented by other crates.

pub mod service;

pub use service::Service;
