//! Core type definitions used across the AgentMart workspace.

pub mod pagination;

pub use pagination::{PageRequest, PageResponse};
