//! Route handlers organized by audience.

pub mod admin;
pub mod agent;
pub mod health;
pub mod listing;
