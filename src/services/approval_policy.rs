//! Approval reduction and policy evaluation.
//!
//! Both functions are pure: the same inputs always give the same outputs.

use crate::models::{ApprovalOutcome, ApprovalSet, RequiredApprovers, Review};

/// Collapse a review history into the latest state per reviewer.
///
/// Reviews are folded in the order given, which the service returns
/// chronologically. A later review always replaces an earlier one from the
/// same reviewer, whatever its state.
pub fn reduce_reviews(reviews: &[Review]) -> ApprovalSet {
    reviews.iter().fold(ApprovalSet::new(), |mut set, review| {
        set.record(review.reviewer.clone(), review.state.clone());
        set
    })
}

/// Check the required approvers against the reduced approval set.
///
/// `missing` keeps the order and multiplicity of `required`.
pub fn evaluate(required: &RequiredApprovers, approvals: &ApprovalSet) -> ApprovalOutcome {
    let current = approvals.current_approvers();

    let missing: Vec<String> = required
        .iter()
        .filter(|username| !current.contains(username))
        .map(str::to_string)
        .collect();

    ApprovalOutcome {
        success: missing.is_empty(),
        missing,
        current_approvers: current.into_iter().map(str::to_string).collect(),
    }
}
