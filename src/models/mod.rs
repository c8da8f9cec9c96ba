//! Data models for the approval check.
//!
//! All entities live for a single run only; nothing is persisted.

pub mod approval;
pub mod pull_request;
pub mod review;

// Re-exports for convenient access
pub use approval::{ApprovalOutcome, ApprovalSet, RequiredApprovers};
pub use pull_request::{PullRequest, RepoId};
pub use review::{Review, ReviewState};
