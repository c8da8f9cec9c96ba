//! GitHub API client.
//!
//! Provides a read-only HTTP client for the GitHub REST API with bearer
//! authentication, `Link`-header pagination and bounded retries for
//! transient failures.

use crate::config::Settings;
use crate::error::AppError;
use crate::models::{PullRequest, RepoId, Review};
use crate::services::review_source::ReviewSource;
use async_trait::async_trait;
use reqwest::{header, Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

/// Pinned REST API version.
const API_VERSION: &str = "2022-11-28";

/// Page size used for list endpoints (GitHub maximum).
const PER_PAGE: &str = "100";

/// Upper bound on pages fetched from one list endpoint.
const MAX_PAGES: u32 = 100;

/// GitHub API client configuration.
#[derive(Debug, Clone)]
pub struct GitHubClientConfig {
    /// API root, e.g. `https://api.github.com`.
    pub base_url: String,

    /// Token sent as `Authorization: Bearer`.
    pub token: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// Retries for transient failures, on top of the first attempt.
    pub max_retries: u32,

    /// Delay before the first retry; doubled on every further attempt.
    pub retry_base_delay: Duration,
}

impl Default for GitHubClientConfig {
    fn default() -> Self {
        Self {
            base_url: crate::config::DEFAULT_API_URL.to_string(),
            token: String::new(),
            timeout_secs: 30,
            max_retries: 2,
            retry_base_delay: Duration::from_millis(500),
        }
    }
}

impl From<&Settings> for GitHubClientConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            base_url: settings.api_url.clone(),
            token: settings.token.clone(),
            timeout_secs: settings.timeout_secs,
            max_retries: settings.max_retries,
            ..Default::default()
        }
    }
}

/// GitHub API client.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    config: GitHubClientConfig,
}

/// GitHub user from API.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubUser {
    pub id: i64,
    pub login: String,
}

/// GitHub repository from API.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubRepository {
    pub id: i64,
    pub full_name: String,
    #[serde(default)]
    pub private: bool,
}

/// GitHub pull request from API.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubPullRequest {
    pub number: u64,
    pub title: String,
    pub state: String,
    pub user: Option<GitHubUser>,
}

/// GitHub pull request review from API.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubReview {
    pub id: i64,
    /// Null when the submitting account has been deleted.
    pub user: Option<GitHubUser>,
    pub state: String,
    pub submitted_at: Option<String>,
}

/// One page of a list endpoint.
#[derive(Debug)]
struct Page<T> {
    data: T,
    next_url: Option<String>,
}

impl GitHubClient {
    /// Create a new GitHub client.
    pub fn new(config: GitHubClientConfig) -> Result<Self, AppError> {
        let mut headers = header::HeaderMap::new();

        let mut auth_value = header::HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|_| AppError::authentication("Invalid token format"))?;
        auth_value.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth_value);
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            header::HeaderValue::from_static(API_VERSION),
        );

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(concat!("approval-gate/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Build the full URL for an API path.
    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Path prefix for a repository, with each segment URL-encoded.
    fn repo_path(repo: &RepoId) -> String {
        format!(
            "/repos/{}/{}",
            urlencoding::encode(&repo.owner),
            urlencoding::encode(&repo.name)
        )
    }

    /// Extract the `rel="next"` target from a `Link` header.
    fn parse_next_link(response: &Response) -> Option<String> {
        let link = response.headers().get(header::LINK)?.to_str().ok()?;

        link.split(',').find_map(|part| {
            let mut segments = part.split(';');
            let target = segments.next()?.trim();
            if segments.any(|s| s.trim() == "rel=\"next\"") {
                target
                    .strip_prefix('<')?
                    .strip_suffix('>')
                    .map(str::to_string)
            } else {
                None
            }
        })
    }

    /// Accept a pagination link only if it stays under the configured API root,
    /// since every request carries the bearer token.
    fn checked_next_url(&self, next: String) -> Result<String, AppError> {
        let root = format!("{}/", self.config.base_url.trim_end_matches('/'));
        if next.starts_with(&root) {
            Ok(next)
        } else {
            Err(AppError::github_api(format!(
                "Refusing pagination link outside {}: {}",
                root, next
            )))
        }
    }

    /// Handle API response errors.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: Response,
        endpoint: &str,
        resource: &str,
    ) -> Result<T, AppError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let rate_limited = response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            == Some("0");
        let status_code = status.as_u16();
        let body = response.text().await.unwrap_or_default();
        // GitHub returns errors as {"message": "...", "documentation_url": "..."}
        let body_message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("message")?.as_str().map(String::from));

        match status {
            StatusCode::UNAUTHORIZED => Err(AppError::authentication(
                body_message.unwrap_or_else(|| "Bad credentials".to_string()),
            )),
            StatusCode::NOT_FOUND => Err(AppError::not_found_with_id(resource, endpoint)),
            _ => {
                let message = match (status, &body_message) {
                    (StatusCode::FORBIDDEN, _) if rate_limited => {
                        "Rate limit exceeded".to_string()
                    }
                    (StatusCode::FORBIDDEN, _) => "Access denied".to_string(),
                    (StatusCode::TOO_MANY_REQUESTS, _) => "Rate limit exceeded".to_string(),
                    (_, Some(msg)) => msg.clone(),
                    _ => format!("Request failed ({}): {}", status_code, body),
                };
                Err(AppError::github_api_full(message, status_code, endpoint))
            }
        }
    }

    /// Make a single GET request to a full URL.
    async fn get_once<T: DeserializeOwned>(
        &self,
        url: &str,
        endpoint: &str,
        resource: &str,
    ) -> Result<Page<T>, AppError> {
        log::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let next_url = Self::parse_next_link(&response);
        let data = self.handle_response(response, endpoint, resource).await?;
        Ok(Page { data, next_url })
    }

    /// GET with bounded retries for transient failures.
    async fn get_with_retry<T: DeserializeOwned>(
        &self,
        url: &str,
        endpoint: &str,
        resource: &str,
    ) -> Result<Page<T>, AppError> {
        let mut attempt = 0u32;

        loop {
            match self.get_once(url, endpoint, resource).await {
                Err(e) if e.is_transient() && attempt < self.config.max_retries => {
                    let delay = self.config.retry_base_delay * 2u32.saturating_pow(attempt);
                    attempt += 1;
                    log::warn!(
                        "Transient failure on {} ({}), retry {}/{} in {:?}",
                        endpoint,
                        e,
                        attempt,
                        self.config.max_retries,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                result => return result,
            }
        }
    }

    /// Fetch all pages of a list endpoint, in service order.
    pub async fn get_all_pages<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        resource: &str,
    ) -> Result<Vec<T>, AppError> {
        let mut all_data = Vec::new();
        let mut url = format!("{}?per_page={}&page=1", self.api_url(endpoint), PER_PAGE);
        let mut pages = 0u32;

        loop {
            let page: Page<Vec<T>> = self.get_with_retry(&url, endpoint, resource).await?;
            pages += 1;
            all_data.extend(page.data);

            let Some(next) = page.next_url else {
                break;
            };
            if pages >= MAX_PAGES {
                return Err(AppError::github_api(format!(
                    "{} exceeds {} pages",
                    endpoint, MAX_PAGES
                )));
            }
            url = self.checked_next_url(next)?;
        }

        log::debug!(
            "Fetched {} item(s) from {} in {} page(s)",
            all_data.len(),
            endpoint,
            pages
        );
        Ok(all_data)
    }

    /// Resolve a repository by `owner/repo`.
    pub async fn get_repository(&self, repo: &RepoId) -> Result<GitHubRepository, AppError> {
        let endpoint = Self::repo_path(repo);
        let url = self.api_url(&endpoint);
        let page: Page<GitHubRepository> = self
            .get_with_retry(&url, &endpoint, &format!("Repository {}", repo))
            .await?;
        Ok(page.data)
    }

    /// Get a single pull request by number.
    pub async fn get_pull(
        &self,
        repo: &RepoId,
        number: u64,
    ) -> Result<GitHubPullRequest, AppError> {
        let endpoint = format!("{}/pulls/{}", Self::repo_path(repo), number);
        let url = self.api_url(&endpoint);
        let page: Page<GitHubPullRequest> = self
            .get_with_retry(&url, &endpoint, &format!("Pull request {}#{}", repo, number))
            .await?;
        Ok(page.data)
    }

    /// List every review on a pull request, oldest first.
    pub async fn list_reviews(
        &self,
        repo: &RepoId,
        number: u64,
    ) -> Result<Vec<GitHubReview>, AppError> {
        let endpoint = format!("{}/pulls/{}/reviews", Self::repo_path(repo), number);
        self.get_all_pages(&endpoint, &format!("Reviews of {}#{}", repo, number))
            .await
    }
}

#[async_trait]
impl ReviewSource for GitHubClient {
    async fn get_pull_request(&self, repo: &RepoId, number: u64) -> Result<PullRequest, AppError> {
        let repository = self.get_repository(repo).await?;
        log::debug!(
            "Resolved repository {} (id {}, private: {})",
            repository.full_name,
            repository.id,
            repository.private
        );

        let pr = self.get_pull(repo, number).await?;
        Ok(PullRequest {
            number: pr.number,
            title: pr.title,
            state: pr.state,
            author: pr.user.map(|u| u.login),
        })
    }

    async fn fetch_reviews(&self, repo: &RepoId, number: u64) -> Result<Vec<Review>, AppError> {
        let reviews = self.list_reviews(repo, number).await?;

        Ok(reviews
            .into_iter()
            .filter_map(|r| match r.user {
                Some(user) => Some(Review {
                    reviewer: user.login,
                    state: r.state.into(),
                    submitted_at: r.submitted_at,
                }),
                None => {
                    log::debug!("Skipping review {} from a deleted account", r.id);
                    None
                }
            })
            .collect())
    }
}
