//! Business logic services.
//!
//! This module contains the approvers file loader, the GitHub client and the
//! pure approval policy.
//!
//! Services are independent of the process boundary and can be driven with
//! synthetic inputs.

pub mod approval_policy;
pub mod approvers_config;
pub mod github_client;
pub mod review_source;

pub use approval_policy::{evaluate, reduce_reviews};
pub use approvers_config::load_required_approvers;
pub use github_client::{GitHubClient, GitHubClientConfig};
pub use review_source::ReviewSource;
