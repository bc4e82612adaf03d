//! # agentmart-api
//!
//! HTTP API layer for AgentMart built on Axum.
//!
//! Exposes the seller, public, and staff endpoints over the listing review
//! workflow, plus middleware (CORS, request logging), extractors, DTOs, and
//! error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::ApiError;
pub use state::AppState;
