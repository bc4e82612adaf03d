//! User domain values. Accounts themselves live in the upstream identity service.

pub mod role;

pub use role::UserRole;
