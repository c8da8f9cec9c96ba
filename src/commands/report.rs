//! Translation of a check result into a status line and exit code.

use crate::error::AppError;
use crate::models::ApprovalOutcome;
use std::process::ExitCode;

/// Exit status when every required approver has approved.
pub const EXIT_APPROVED: u8 = 0;

/// Exit status for missing approvals and for any fatal error.
pub const EXIT_FAILURE: u8 = 1;

/// Final outcome of a run as shown to CI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Single human-readable status line.
    pub line: String,
    pub exit_status: u8,
}

impl Report {
    pub fn from_outcome(outcome: &ApprovalOutcome) -> Self {
        if outcome.success {
            Self {
                line: "✅ All required approvals have been obtained".to_string(),
                exit_status: EXIT_APPROVED,
            }
        } else {
            Self {
                line: format!(
                    "❌ Missing required approvals from: {}",
                    outcome.missing.join(", ")
                ),
                exit_status: EXIT_FAILURE,
            }
        }
    }

    pub fn from_error(err: &AppError) -> Self {
        let line = match err {
            AppError::MissingEnvironment { .. } => format!("Error: {}", err),
            _ => format!("Error checking approvals: {}", err),
        };
        Self {
            line,
            exit_status: EXIT_FAILURE,
        }
    }

    pub fn from_result(result: &Result<ApprovalOutcome, AppError>) -> Self {
        match result {
            Ok(outcome) => Self::from_outcome(outcome),
            Err(err) => Self::from_error(err),
        }
    }

    /// Print the status line to stdout.
    pub fn print(&self) {
        println!("{}", self.line);
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit_status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn outcome(missing: &[&str]) -> ApprovalOutcome {
        ApprovalOutcome {
            success: missing.is_empty(),
            missing: missing.iter().map(|s| s.to_string()).collect(),
            current_approvers: Vec::new(),
        }
    }

    #[test]
    fn test_success_report() {
        let report = Report::from_outcome(&outcome(&[]));
        assert_eq!(report.line, "✅ All required approvals have been obtained");
        assert_eq!(report.exit_status, 0);
    }

    #[test]
    fn test_missing_approvers_report() {
        let report = Report::from_outcome(&outcome(&["bob", "carol"]));
        assert_eq!(report.line, "❌ Missing required approvals from: bob, carol");
        assert_eq!(report.exit_status, 1);
    }

    #[test]
    fn test_error_report() {
        let report = Report::from_result(&Err(AppError::authentication("Bad credentials")));
        assert_eq!(
            report.line,
            "Error checking approvals: Authentication error: Bad credentials"
        );
        assert_eq!(report.exit_status, 1);
    }

    #[test]
    fn test_missing_environment_report() {
        let report = Report::from_error(&AppError::missing_environment(["PR_NUMBER"]));
        assert_eq!(
            report.line,
            "Error: Missing required environment variables: PR_NUMBER"
        );
        assert_eq!(report.exit_status, 1);
    }
}
