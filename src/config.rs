//! Process settings read once from the environment.

use crate::error::AppError;
use crate::models::RepoId;

/// Fixed location of the approvers file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = ".github/mandatory-approvers.yml";

/// Default GitHub REST API root.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_RETRIES: u32 = 2;

/// Settings for one run of the checker.
#[derive(Clone)]
pub struct Settings {
    /// Bearer token for the GitHub API.
    pub token: String,
    pub repository: RepoId,
    pub pr_number: u64,
    pub api_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Retries for transient failures, on top of the first attempt.
    pub max_retries: u32,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("token", &"<redacted>")
            .field("repository", &self.repository)
            .field("pr_number", &self.pr_number)
            .field("api_url", &self.api_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl Settings {
    /// Load settings from the process environment.
    ///
    /// | Env Var                 | Required | Default                  |
    /// |-------------------------|----------|--------------------------|
    /// | `GITHUB_TOKEN`          | **yes**  | --                       |
    /// | `GITHUB_REPOSITORY`     | **yes**  | --                       |
    /// | `PR_NUMBER`             | **yes**  | --                       |
    /// | `GITHUB_API_URL`        | no       | `https://api.github.com` |
    /// | `APPROVAL_TIMEOUT_SECS` | no       | `30`                     |
    /// | `APPROVAL_MAX_RETRIES`  | no       | `2`                      |
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load settings through an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset. All missing required variables are
    /// reported together.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let token = get("GITHUB_TOKEN");
        let repository = get("GITHUB_REPOSITORY");
        let pr_number = get("PR_NUMBER");

        let (token, repository, pr_number) = match (token, repository, pr_number) {
            (Some(t), Some(r), Some(p)) => (t.trim().to_string(), r, p),
            (t, r, p) => {
                let missing = [
                    ("GITHUB_TOKEN", t.is_none()),
                    ("GITHUB_REPOSITORY", r.is_none()),
                    ("PR_NUMBER", p.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, absent)| absent.then_some(name));
                return Err(AppError::missing_environment(missing));
            }
        };

        let repository = RepoId::parse(&repository).ok_or_else(|| {
            AppError::invalid_input_field(
                format!("expected owner/repo, got '{}'", repository),
                "GITHUB_REPOSITORY",
            )
        })?;

        let pr_number = match pr_number.trim().parse::<u64>() {
            Ok(n) if n > 0 => n,
            _ => {
                return Err(AppError::invalid_input_field(
                    format!("expected a positive integer, got '{}'", pr_number),
                    "PR_NUMBER",
                ))
            }
        };

        let api_url = get("GITHUB_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let timeout_secs = parse_optional(&get, "APPROVAL_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        let max_retries = parse_optional(&get, "APPROVAL_MAX_RETRIES", DEFAULT_MAX_RETRIES)?;

        Ok(Self {
            token,
            repository,
            pr_number,
            api_url,
            timeout_secs,
            max_retries,
        })
    }
}

fn parse_optional<T, G>(get: &G, name: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| {
            AppError::invalid_input_field(format!("invalid value '{}'", raw), name)
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_required_variables_with_defaults() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("GITHUB_TOKEN", "ghp_secret"),
            ("GITHUB_REPOSITORY", "acme/widgets"),
            ("PR_NUMBER", "42"),
        ]))
        .unwrap();

        assert_eq!(settings.repository.to_string(), "acme/widgets");
        assert_eq!(settings.pr_number, 42);
        assert_eq!(settings.api_url, DEFAULT_API_URL);
        assert_eq!(settings.timeout_secs, 30);
        assert_eq!(settings.max_retries, 2);
    }

    #[test]
    fn test_missing_variables_reported_together() {
        let err = Settings::from_lookup(lookup_from(&[
            ("GITHUB_REPOSITORY", "acme/widgets"),
            ("PR_NUMBER", ""),
        ]))
        .unwrap_err();

        match err {
            AppError::MissingEnvironment { variables } => {
                assert_eq!(variables, vec!["GITHUB_TOKEN", "PR_NUMBER"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_pr_number() {
        for bad in ["abc", "0", "-3"] {
            let err = Settings::from_lookup(lookup_from(&[
                ("GITHUB_TOKEN", "t"),
                ("GITHUB_REPOSITORY", "acme/widgets"),
                ("PR_NUMBER", bad),
            ]))
            .unwrap_err();
            assert!(
                matches!(err, AppError::InvalidInput { ref field, .. } if field.as_deref() == Some("PR_NUMBER")),
                "{bad}: {err:?}"
            );
        }
    }

    #[test]
    fn test_invalid_repository() {
        let err = Settings::from_lookup(lookup_from(&[
            ("GITHUB_TOKEN", "t"),
            ("GITHUB_REPOSITORY", "widgets"),
            ("PR_NUMBER", "1"),
        ]))
        .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput { .. }));
    }

    #[test]
    fn test_optional_overrides() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("GITHUB_TOKEN", "t"),
            ("GITHUB_REPOSITORY", "acme/widgets"),
            ("PR_NUMBER", "7"),
            ("GITHUB_API_URL", "https://ghe.example.com/api/v3"),
            ("APPROVAL_TIMEOUT_SECS", "5"),
            ("APPROVAL_MAX_RETRIES", "0"),
        ]))
        .unwrap();

        assert_eq!(settings.api_url, "https://ghe.example.com/api/v3");
        assert_eq!(settings.timeout_secs, 5);
        assert_eq!(settings.max_retries, 0);

        let err = Settings::from_lookup(lookup_from(&[
            ("GITHUB_TOKEN", "t"),
            ("GITHUB_REPOSITORY", "acme/widgets"),
            ("PR_NUMBER", "7"),
            ("APPROVAL_MAX_RETRIES", "lots"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("invalid value 'lots'"));
    }

    #[test]
    fn test_token_surrounding_whitespace_is_stripped() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("GITHUB_TOKEN", "ghp_secret\n"),
            ("GITHUB_REPOSITORY", "acme/widgets"),
            ("PR_NUMBER", "1"),
        ]))
        .unwrap();
        assert_eq!(settings.token, "ghp_secret");
    }

    #[test]
    fn test_debug_redacts_token() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("GITHUB_TOKEN", "ghp_secret"),
            ("GITHUB_REPOSITORY", "acme/widgets"),
            ("PR_NUMBER", "1"),
        ]))
        .unwrap();
        let debug = format!("{:?}", settings);
        assert!(!debug.contains("ghp_secret"));
        assert!(debug.contains("<redacted>"));
    }
}
