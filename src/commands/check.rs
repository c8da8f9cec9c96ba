//! The approval check pipeline.
//!
//! Loader, fetcher, reducer and evaluator run strictly in sequence, each
//! consuming the previous step's output.

use crate::config::Settings;
use crate::error::AppError;
use crate::models::ApprovalOutcome;
use crate::services::{evaluate, load_required_approvers, reduce_reviews, ReviewSource};
use std::path::Path;

/// Check whether every required approver has currently approved the pull
/// request named in `settings`.
///
/// The approvers file is read before any remote call, so a missing or broken
/// file fails the run without touching the network.
///
/// # Arguments
/// * `settings` - Repository and pull request to check
/// * `config_path` - Location of the approvers file
/// * `source` - Where pull request metadata and reviews come from
pub async fn check_approvals(
    settings: &Settings,
    config_path: &Path,
    source: &dyn ReviewSource,
) -> Result<ApprovalOutcome, AppError> {
    let required = load_required_approvers(config_path)?;

    let repo = &settings.repository;
    let pr = source.get_pull_request(repo, settings.pr_number).await?;
    log::debug!(
        "Checking {}#{} \"{}\" ({})",
        repo,
        pr.number,
        pr.title,
        pr.state
    );

    let reviews = source.fetch_reviews(repo, pr.number).await?;
    let approvals = reduce_reviews(&reviews);
    for (reviewer, state) in approvals.iter() {
        log::debug!("Latest review from {}: {}", reviewer, state);
    }

    let outcome = evaluate(&required, &approvals);
    log::info!(
        "{} review(s), {} current approver(s), {} of {} required approver(s) missing",
        reviews.len(),
        outcome.current_approvers.len(),
        outcome.missing.len(),
        required.len()
    );

    Ok(outcome)
}
