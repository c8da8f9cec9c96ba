//! Abstraction over the code-hosting service the reviews come from.

use crate::error::AppError;
use crate::models::{PullRequest, RepoId, Review};
use async_trait::async_trait;

/// Read-only access to pull request metadata and review history.
///
/// [`GitHubClient`](crate::services::GitHubClient) is the production
/// implementation; tests substitute in-memory fakes.
#[async_trait]
pub trait ReviewSource: Send + Sync {
    /// Resolve the repository and fetch one pull request by number.
    async fn get_pull_request(&self, repo: &RepoId, number: u64) -> Result<PullRequest, AppError>;

    /// Fetch the complete review history of a pull request, oldest first.
    async fn fetch_reviews(&self, repo: &RepoId, number: u64) -> Result<Vec<Review>, AppError>;
}
