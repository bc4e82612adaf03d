//! Service marker trait.

/// Marker trait for business logic services.
///
/// All services in `agentmart-service` implement this trait so they can be
/// shared behind `Arc` across request handlers and CLI commands.
pub trait Service: Send + Sync + 'static {}
