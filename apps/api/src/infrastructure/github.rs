//! GitHub repository lookup
//!
//! Fetches a user's five oldest public repositories. Failures are kept
//! distinct (missing user, rate limiting, other upstream status, transport)
//! so the API can report them separately.

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{StatusCode, Url};
use thiserror::Error;

use crate::config::GithubConfig;

const MAX_USERNAME_LEN: usize = 39;

#[derive(Debug, Error)]
pub enum GithubError {
    #[error("github user not found")]
    NotFound,

    #[error("github rate limit exceeded")]
    RateLimited,

    #[error("github responded with status {0}")]
    Status(u16),

    #[error("github request failed: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for GithubError {
    fn from(e: reqwest::Error) -> Self {
        GithubError::Transport(e.to_string())
    }
}

/// Upstream lookup used by the profile routes
#[async_trait]
pub trait GithubClient: Send + Sync {
    /// The user's public repositories, as GitHub returned them
    async fn user_repos(&self, username: &str) -> Result<serde_json::Value, GithubError>;
}

/// GitHub logins: 1-39 ASCII alphanumerics or hyphens, no leading or
/// trailing hyphen
pub fn is_valid_username(username: &str) -> bool {
    !username.is_empty()
        && username.len() <= MAX_USERNAME_LEN
        && username.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        && !username.starts_with('-')
        && !username.ends_with('-')
}

/// GitHub also answers 403 for abuse detection and blocked resources; only
/// an exhausted quota counts as rate limiting
fn classify(status: StatusCode, headers: &HeaderMap) -> GithubError {
    let quota_exhausted = headers
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim() == "0");

    match status {
        StatusCode::NOT_FOUND => GithubError::NotFound,
        StatusCode::TOO_MANY_REQUESTS => GithubError::RateLimited,
        StatusCode::FORBIDDEN if quota_exhausted => GithubError::RateLimited,
        other => GithubError::Status(other.as_u16()),
    }
}

/// reqwest-backed client for api.github.com (or a configured mirror)
pub struct HttpGithubClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Option<(String, String)>,
}

impl HttpGithubClient {
    pub fn new(config: &GithubConfig) -> Result<Self, GithubError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("devconnect-api/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()?;

        let base_url = Url::parse(&config.api_url)
            .map_err(|e| GithubError::Transport(format!("invalid GitHub API url: {}", e)))?;

        let credentials = match (&config.client_id, &config.client_secret) {
            (Some(id), Some(secret)) => Some((id.clone(), secret.clone())),
            _ => None,
        };

        Ok(Self {
            http,
            base_url,
            credentials,
        })
    }

    fn repos_url(&self, username: &str) -> Result<Url, GithubError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GithubError::Transport("GitHub API url cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(["users", username, "repos"]);
        url.query_pairs_mut()
            .append_pair("per_page", "5")
            .append_pair("sort", "created")
            .append_pair("direction", "asc");
        Ok(url)
    }
}

#[async_trait]
impl GithubClient for HttpGithubClient {
    async fn user_repos(&self, username: &str) -> Result<serde_json::Value, GithubError> {
        let url = self.repos_url(username)?;

        let mut request = self
            .http
            .get(url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json");
        if let Some((id, secret)) = &self.credentials {
            request = request.basic_auth(id, Some(secret));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::debug!(%status, username, "github lookup rejected");
            return Err(classify(status, response.headers()));
        }

        Ok(response.json::<serde_json::Value>().await?)
    }
}
