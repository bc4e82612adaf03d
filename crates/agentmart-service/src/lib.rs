//! # agentmart-service
//!
//! Business logic for AgentMart. The [`ReviewWorkflow`] owns every listing
//! lifecycle transition; the services around it add authorization,
//! configuration-driven checks, and read-side queries.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod consistency;
pub mod context;
pub mod listing;
pub mod notify;
pub mod review;
pub mod slug;
pub mod workflow;

pub use consistency::{ConsistencyIssue, ConsistencyReport, ConsistencyService, IssueKind};
pub use context::RequestContext;
pub use listing::{Lineage, ListingService};
pub use notify::{AuditNotifier, NotifierSet, TracingNotifier, TransitionNotifier};
pub use review::ReviewService;
pub use slug::SlugResolver;
pub use workflow::{ReviewError, ReviewWorkflow};
