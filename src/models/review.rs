//! Review model.

use serde::{Deserialize, Serialize};

/// State of a submitted pull request review.
///
/// Parsed from the service's textual value by exact, case-sensitive match.
/// Unknown values are kept verbatim in `Other` so they still take part in the
/// last-write-wins fold.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReviewState {
    Approved,
    ChangesRequested,
    Commented,
    Dismissed,
    Pending,
    Other(String),
}

impl ReviewState {
    /// Whether this state counts as a current approval.
    pub fn is_approved(&self) -> bool {
        matches!(self, Self::Approved)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Approved => "APPROVED",
            Self::ChangesRequested => "CHANGES_REQUESTED",
            Self::Commented => "COMMENTED",
            Self::Dismissed => "DISMISSED",
            Self::Pending => "PENDING",
            Self::Other(s) => s,
        }
    }
}

impl From<&str> for ReviewState {
    fn from(s: &str) -> Self {
        match s {
            "APPROVED" => Self::Approved,
            "CHANGES_REQUESTED" => Self::ChangesRequested,
            "COMMENTED" => Self::Commented,
            "DISMISSED" => Self::Dismissed,
            "PENDING" => Self::Pending,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for ReviewState {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<ReviewState> for String {
    fn from(state: ReviewState) -> Self {
        state.as_str().to_string()
    }
}

impl std::fmt::Display for ReviewState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One historical review event on a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Review {
    /// Login of the submitting user.
    pub reviewer: String,

    pub state: ReviewState,

    /// Submission time (ISO 8601), absent for pending reviews.
    pub submitted_at: Option<String>,
}

impl Review {
    pub fn new(reviewer: impl Into<String>, state: impl Into<ReviewState>) -> Self {
        Self {
            reviewer: reviewer.into(),
            state: state.into(),
            submitted_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_states_parse() {
        assert_eq!(ReviewState::from("APPROVED"), ReviewState::Approved);
        assert_eq!(
            ReviewState::from("CHANGES_REQUESTED"),
            ReviewState::ChangesRequested
        );
        assert_eq!(ReviewState::from("DISMISSED"), ReviewState::Dismissed);
    }

    #[test]
    fn test_state_match_is_case_sensitive() {
        let state = ReviewState::from("approved");
        assert_eq!(state, ReviewState::Other("approved".to_string()));
        assert!(!state.is_approved());
    }

    #[test]
    fn test_state_deserializes_from_service_text() {
        let state: ReviewState = serde_json::from_str("\"COMMENTED\"").unwrap();
        assert_eq!(state, ReviewState::Commented);

        let unknown: ReviewState = serde_json::from_str("\"SOMETHING_NEW\"").unwrap();
        assert_eq!(unknown.to_string(), "SOMETHING_NEW");
    }
}
