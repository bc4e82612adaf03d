//! The listing version/review state machine.

pub mod error;
pub mod machine;

pub use error::ReviewError;
pub use machine::ReviewWorkflow;
