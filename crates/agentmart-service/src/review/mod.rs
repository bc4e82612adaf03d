//! Staff review operations.

pub mod service;

pub use service::ReviewService;
