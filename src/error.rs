//! Application error types.
//!
//! Every failure the checker can hit is one of these variants. All of them are
//! fatal to a run; the reporter turns them into a diagnostic line and exit code 1.

use serde::Serialize;
use thiserror::Error;

/// Application-level errors surfaced by the approval check.
///
/// All variants serialize to a structured JSON object so they can be attached
/// to machine-readable logs.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "details")]
pub enum AppError {
    /// The approvers file does not exist.
    #[error("Could not find approvers file at {path}")]
    ConfigNotFound { path: String },

    /// The approvers file exists but could not be read or parsed.
    #[error("Invalid approvers file {path}: {message}")]
    ConfigParse { message: String, path: String },

    /// Required environment variables are absent.
    #[error("Missing required environment variables: {}", .variables.join(", "))]
    MissingEnvironment { variables: Vec<String> },

    /// GitHub API request failed.
    #[error("GitHub API error: {message}")]
    GitHubApi {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        status_code: Option<u16>,
        #[serde(skip_serializing_if = "Option::is_none")]
        endpoint: Option<String>,
    },

    /// Network request failed.
    #[error("Network error: {message}")]
    Network { message: String },

    /// Credentials are invalid, expired or revoked.
    #[error("Authentication error: {message}")]
    Authentication { message: String },

    /// Requested resource not found or not visible with these credentials.
    #[error("Not found: {resource}")]
    NotFound {
        resource: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },

    /// Invalid input provided.
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        field: Option<String>,
    },

    /// Internal application error.
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl AppError {
    /// Create a config-not-found error.
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create a config parse error for the given file.
    pub fn config_parse(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            path: path.into(),
        }
    }

    /// Create a missing environment error listing every absent variable.
    pub fn missing_environment<I, S>(variables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::MissingEnvironment {
            variables: variables.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a GitHub API error.
    pub fn github_api(message: impl Into<String>) -> Self {
        Self::GitHubApi {
            message: message.into(),
            status_code: None,
            endpoint: None,
        }
    }

    /// Create a GitHub API error with status code and endpoint.
    pub fn github_api_full(
        message: impl Into<String>,
        status_code: u16,
        endpoint: impl Into<String>,
    ) -> Self {
        Self::GitHubApi {
            message: message.into(),
            status_code: Some(status_code),
            endpoint: Some(endpoint.into()),
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Create a not found error.
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: None,
        }
    }

    /// Create a not found error with ID.
    pub fn not_found_with_id(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: Some(id.into()),
        }
    }

    /// Create an invalid input error with field name.
    pub fn invalid_input_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether retrying the same request could succeed.
    ///
    /// Connectivity failures and gateway-style server errors qualify; anything
    /// the server answered deliberately (401, 404, 422, ...) does not.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network { .. } => true,
            Self::GitHubApi {
                status_code: Some(code),
                ..
            } => matches!(code, 500 | 502 | 503 | 504),
            _ => false,
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::network("Request timed out")
        } else if err.is_connect() {
            Self::network("Failed to connect to server")
        } else if err.is_decode() {
            Self::internal(format!("Failed to parse response: {}", err))
        } else {
            Self::network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let err = AppError::config_not_found(".github/mandatory-approvers.yml");
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"type\":\"ConfigNotFound\""));
        assert!(json.contains("mandatory-approvers.yml"));
    }

    #[test]
    fn test_github_api_error_full() {
        let err = AppError::github_api_full("Resource not found", 404, "/repos/acme/widgets");
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"status_code\":404"));
        assert!(json.contains("/repos/acme/widgets"));
    }

    #[test]
    fn test_optional_fields_not_serialized() {
        let err = AppError::not_found("PullRequest");
        let json = serde_json::to_string(&err).unwrap();
        assert!(!json.contains("\"id\""));
    }

    #[test]
    fn test_missing_environment_display() {
        let err = AppError::missing_environment(["GITHUB_TOKEN", "PR_NUMBER"]);
        assert_eq!(
            err.to_string(),
            "Missing required environment variables: GITHUB_TOKEN, PR_NUMBER"
        );
    }

    #[test]
    fn test_display_impl() {
        let err = AppError::authentication("Bad credentials");
        assert_eq!(format!("{}", err), "Authentication error: Bad credentials");
    }

    #[test]
    fn test_transient_classification() {
        assert!(AppError::network("connection reset").is_transient());
        assert!(AppError::github_api_full("Bad gateway", 502, "/repos/a/b").is_transient());
        assert!(!AppError::github_api_full("Validation failed", 422, "/repos/a/b").is_transient());
        assert!(!AppError::github_api("no status").is_transient());
        assert!(!AppError::authentication("Bad credentials").is_transient());
        assert!(!AppError::not_found("Repository").is_transient());
    }
}
