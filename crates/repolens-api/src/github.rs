use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const GITHUB_API_BASE: &str = "https://api.github.com";

#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Authentication required")]
    AuthRequired,

    #[error("Service unavailable (status {0})")]
    Unavailable(u16),

    #[error("API request failed with status {0}")]
    RequestFailed(u16),

    #[error("Request timed out")]
    Timeout,

    #[error("Network error: {0}")]
    NetworkError(reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    ParseError(#[from] serde_json::Error),
}

impl From<reqwest::Error> for GitHubError {
    fn from(err: reqwest::Error) -> Self {
        // reqwest folds timeouts into its one error type; the callers care
        // about the difference, so split it back out here.
        if err.is_timeout() {
            GitHubError::Timeout
        } else {
            GitHubError::NetworkError(err)
        }
    }
}

pub type Result<T> = std::result::Result<T, GitHubError>;

/// One page of a user's repositories plus the raw `Link` header that
/// accompanied it. Pagination lives only in that header, so it travels with
/// the items untouched.
#[derive(Debug, Clone)]
pub struct RepoPage {
    pub items: Vec<GitHubRepo>,
    pub link_header: Option<String>,
}

pub struct GitHubClient {
    client: reqwest::Client,
    token: Option<String>,
    base_url: String,
}

impl GitHubClient {
    pub fn new(token: Option<String>) -> Self {
        Self::with_base_url(token, GITHUB_API_BASE.to_string())
    }

    /// For GitHub Enterprise or testing with a custom API URL
    pub fn with_base_url(token: Option<String>, base_url: String) -> Self {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("repolens/0.1.0"),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/vnd.github+json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            token,
            base_url,
        }
    }

    /// List a user's repositories, one page at a time.
    ///
    /// `page` is 1-indexed. An empty response body counts as an empty page,
    /// not an error.
    pub async fn user_repositories(
        &self,
        username: &str,
        page: u32,
        per_page: u32,
    ) -> Result<RepoPage> {
        let url = format!("{}/users/{}/repos", self.base_url, username);

        let mut request = self.client.get(&url).query(&[
            ("per_page", per_page.to_string()),
            ("page", page.to_string()),
        ]);

        if let Some(ref token) = self.token {
            request = request.header(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", token),
            );
        }

        debug!(username, page, "fetching repositories");

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(error_for_status(status, username));
        }

        let link_header = response
            .headers()
            .get(reqwest::header::LINK)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        debug!(
            %status,
            link = link_header.as_deref().unwrap_or(""),
            "repositories response"
        );

        let body = response.text().await?;
        let items: Vec<GitHubRepo> = if body.trim().is_empty() {
            Vec::new()
        } else {
            serde_json::from_str(&body)?
        };

        Ok(RepoPage { items, link_header })
    }
}

/// Map a non-success HTTP status to the matching error.
fn error_for_status(status: reqwest::StatusCode, username: &str) -> GitHubError {
    use reqwest::StatusCode;

    match status {
        StatusCode::NOT_FOUND => GitHubError::UserNotFound(username.to_string()),
        StatusCode::FORBIDDEN => GitHubError::RateLimitExceeded,
        StatusCode::UNAUTHORIZED => GitHubError::AuthRequired,
        StatusCode::INTERNAL_SERVER_ERROR | StatusCode::SERVICE_UNAVAILABLE => {
            GitHubError::Unavailable(status.as_u16())
        }
        _ => GitHubError::RequestFailed(status.as_u16()),
    }
}

/// GitHub repository as the REST API serializes it.
///
/// `updated_at` stays an ISO-8601 string; nothing downstream does date math
/// with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitHubRepo {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub owner: GitHubOwner,
    pub description: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub stargazers_count: u32,
    #[serde(default)]
    pub forks_count: u32,
    #[serde(default)]
    pub language: Option<String>,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitHubOwner {
    pub id: u64,
    pub login: String,
    pub avatar_url: String,
    pub html_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = GitHubClient::new(None);
        assert!(client.token.is_none());
        assert_eq!(client.base_url, GITHUB_API_BASE);
    }

    #[test]
    fn test_client_with_token() {
        let client = GitHubClient::new(Some("ghp_testtoken".to_string()));
        assert_eq!(client.token.as_deref(), Some("ghp_testtoken"));
    }

    #[test]
    fn test_with_base_url() {
        let client =
            GitHubClient::with_base_url(None, "https://ghe.example.com/api/v3".to_string());
        assert_eq!(client.base_url, "https://ghe.example.com/api/v3");
    }

    #[test]
    fn test_error_for_status() {
        use reqwest::StatusCode;

        assert!(matches!(
            error_for_status(StatusCode::NOT_FOUND, "octocat"),
            GitHubError::UserNotFound(name) if name == "octocat"
        ));
        assert!(matches!(
            error_for_status(StatusCode::FORBIDDEN, "octocat"),
            GitHubError::RateLimitExceeded
        ));
        assert!(matches!(
            error_for_status(StatusCode::UNAUTHORIZED, "octocat"),
            GitHubError::AuthRequired
        ));
        assert!(matches!(
            error_for_status(StatusCode::INTERNAL_SERVER_ERROR, "octocat"),
            GitHubError::Unavailable(500)
        ));
        assert!(matches!(
            error_for_status(StatusCode::SERVICE_UNAVAILABLE, "octocat"),
            GitHubError::Unavailable(503)
        ));
        assert!(matches!(
            error_for_status(StatusCode::IM_A_TEAPOT, "octocat"),
            GitHubError::RequestFailed(418)
        ));
    }

    #[test]
    fn test_repo_deserialization() {
        let json = r#"{
            "id": 1296269,
            "name": "Hello-World",
            "full_name": "octocat/Hello-World",
            "owner": {
                "id": 1,
                "login": "octocat",
                "avatar_url": "https://github.com/images/error/octocat_happy.gif",
                "html_url": "https://github.com/octocat"
            },
            "description": "This your first repo!",
            "html_url": "https://github.com/octocat/Hello-World",
            "stargazers_count": 80,
            "forks_count": 9,
            "language": "Rust",
            "updated_at": "2011-01-26T19:14:43Z"
        }"#;

        let repo: GitHubRepo = serde_json::from_str(json).unwrap();
        assert_eq!(repo.id, 1296269);
        assert_eq!(repo.full_name, "octocat/Hello-World");
        assert_eq!(repo.owner.login, "octocat");
        assert_eq!(repo.stargazers_count, 80);
        assert_eq!(repo.updated_at, "2011-01-26T19:14:43Z");
    }

    #[test]
    fn test_repo_deserialization_with_nulls() {
        let json = r#"{
            "id": 42,
            "name": "empty",
            "full_name": "octocat/empty",
            "owner": {
                "id": 1,
                "login": "octocat",
                "avatar_url": "https://avatars.githubusercontent.com/u/1",
                "html_url": "https://github.com/octocat"
            },
            "description": null,
            "html_url": "https://github.com/octocat/empty",
            "stargazers_count": 0,
            "forks_count": 0,
            "language": null,
            "updated_at": "2024-05-01T00:00:00Z"
        }"#;

        let repo: GitHubRepo = serde_json::from_str(json).unwrap();
        assert!(repo.description.is_none());
        assert!(repo.language.is_none());
    }
}
