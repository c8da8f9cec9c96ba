//! Approval Gate - CI check that every mandatory reviewer has approved a
//! pull request.
//!
//! The required approvers come from `.github/mandatory-approvers.yml`; the
//! review history comes from the GitHub API. The process exits 0 only when
//! every required approver's latest review is an approval.

pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

use commands::{check_approvals, Report};
use config::{Settings, DEFAULT_CONFIG_PATH};
use error::AppError;
use models::ApprovalOutcome;
use services::{GitHubClient, GitHubClientConfig};
use std::path::Path;
use std::process::ExitCode;

/// Run one check against the real environment and return the exit code.
pub fn run() -> ExitCode {
    init_logging();

    let result = Settings::from_env().and_then(|settings| {
        log::debug!("Loaded settings: {:?}", settings);
        execute(&settings)
    });

    match &result {
        Ok(outcome) => log::debug!(
            "Outcome: {}",
            serde_json::to_string(outcome).unwrap_or_default()
        ),
        Err(err) => log::debug!(
            "Check failed: {}",
            serde_json::to_string(err).unwrap_or_default()
        ),
    }

    let report = Report::from_result(&result);
    report.print();
    report.exit_code()
}

/// Drive the check on a single-threaded runtime; every step is sequential.
fn execute(settings: &Settings) -> Result<ApprovalOutcome, AppError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| AppError::internal(format!("Failed to start async runtime: {}", e)))?;

    let client = {
        let _guard = runtime.enter();
        GitHubClient::new(GitHubClientConfig::from(settings))?
    };
    runtime.block_on(check_approvals(
        settings,
        Path::new(DEFAULT_CONFIG_PATH),
        &client,
    ))
}

/// Log to stderr at `warn` unless `RUST_LOG` says otherwise, keeping stdout
/// for the status line.
fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_target(false)
        .try_init();
}
