//! Offline consistency scan and repair of the denormalized listing flags.

pub mod report;
pub mod service;

pub use report::{ConsistencyIssue, ConsistencyReport, IssueKind, RepairSummary};
pub use service::ConsistencyService;
