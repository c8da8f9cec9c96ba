//! Approval models: required approvers, reduced review states and the
//! evaluation outcome.

use super::review::ReviewState;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Usernames that must have approved, in configured order.
///
/// Duplicates are kept as written in the approvers file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequiredApprovers(pub Vec<String>);

impl RequiredApprovers {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for RequiredApprovers {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Latest review state per reviewer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ApprovalSet(BTreeMap<String, ReviewState>);

impl ApprovalSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `state` as the latest state for `reviewer`, replacing any earlier one.
    pub fn record(&mut self, reviewer: impl Into<String>, state: ReviewState) {
        self.0.insert(reviewer.into(), state);
    }

    pub fn state_of(&self, reviewer: &str) -> Option<&ReviewState> {
        self.0.get(reviewer)
    }

    /// Reviewers whose latest state is `APPROVED`.
    pub fn current_approvers(&self) -> BTreeSet<&str> {
        self.0
            .iter()
            .filter(|(_, state)| state.is_approved())
            .map(|(reviewer, _)| reviewer.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ReviewState)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Result of evaluating the required approvers against the approval set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalOutcome {
    /// True iff every required approver has currently approved.
    pub success: bool,

    /// Required approvers without a current approval, in configured order.
    pub missing: Vec<String>,

    /// Everyone whose latest review is an approval, sorted.
    pub current_approvers: Vec<String>,
}
