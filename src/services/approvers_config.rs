//! Loader for the mandatory approvers file.
//!
//! The file is YAML with a single meaningful key:
//!
//! ```yaml
//! required_approvers:
//!   - alice
//!   - bob
//! ```

use crate::error::AppError;
use crate::models::RequiredApprovers;
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::Path;

/// On-disk shape of the approvers file. Unknown keys are ignored.
#[derive(Debug, Default, Deserialize)]
struct ApproversFile {
    #[serde(default)]
    required_approvers: Option<RequiredApprovers>,
}

/// Read the required approvers from `path`.
///
/// An empty document, a missing key and an explicit `null` all yield an empty
/// list. A missing file is `ConfigNotFound`; anything unreadable or of the
/// wrong shape is `ConfigParse`.
pub fn load_required_approvers(path: impl AsRef<Path>) -> Result<RequiredApprovers, AppError> {
    let path = path.as_ref();
    let display = path.display().to_string();

    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => AppError::config_not_found(&display),
        _ => AppError::config_parse(format!("Failed to read file: {}", e), &display),
    })?;

    let approvers = parse_required_approvers(&content)
        .map_err(|e| AppError::config_parse(e.to_string(), &display))?;

    log::debug!(
        "Loaded {} required approver(s) from {}",
        approvers.len(),
        display
    );
    Ok(approvers)
}

/// Parse the approvers document from a YAML string.
pub fn parse_required_approvers(content: &str) -> Result<RequiredApprovers, serde_yaml::Error> {
    if content.trim().is_empty() {
        return Ok(RequiredApprovers::default());
    }

    let file: Option<ApproversFile> = serde_yaml::from_str(content)?;
    Ok(file
        .and_then(|f| f.required_approvers)
        .unwrap_or_default())
}
