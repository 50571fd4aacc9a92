// GitHub bridge - wires the API client into the RepositorySource seam
use async_trait::async_trait;
use repolens_api::{GitHubClient, GitHubError, GitHubRepo};
use tracing::warn;

use crate::{
    fetch::{RepositoryPage, RepositorySource},
    models::{Owner, Repository},
    Error, Result,
};

/// Wrapper around `GitHubClient` that implements `RepositorySource`.
pub struct GitHubProvider {
    client: GitHubClient,
}

impl GitHubProvider {
    pub fn new(token: Option<String>) -> Self {
        Self {
            client: GitHubClient::new(token),
        }
    }

    /// For GitHub Enterprise or tests pointing at a local server.
    pub fn with_base_url(token: Option<String>, base_url: String) -> Self {
        Self {
            client: GitHubClient::with_base_url(token, base_url),
        }
    }
}

#[async_trait]
impl RepositorySource for GitHubProvider {
    async fn user_repositories(
        &self,
        username: &str,
        page: u32,
        per_page: u32,
    ) -> Result<RepositoryPage> {
        let fetched = self
            .client
            .user_repositories(username, page, per_page)
            .await
            .map_err(into_error)?;

        Ok(RepositoryPage {
            repositories: fetched
                .items
                .into_iter()
                .map(github_to_repository)
                .collect(),
            link_header: fetched.link_header,
        })
    }
}

/// Convert a GitHub API repo into our internal Repository model.
fn github_to_repository(gh: GitHubRepo) -> Repository {
    Repository {
        id: gh.id,
        name: gh.name,
        full_name: gh.full_name,
        owner: Owner {
            id: gh.owner.id,
            login: gh.owner.login,
            avatar_url: gh.owner.avatar_url,
            url: gh.owner.html_url,
        },
        description: gh.description,
        url: gh.html_url,
        stars: gh.stargazers_count,
        forks: gh.forks_count,
        language: gh.language,
        updated_at: gh.updated_at,
    }
}

fn into_error(err: GitHubError) -> Error {
    match err {
        GitHubError::UserNotFound(username) => Error::UserNotFound(username),
        GitHubError::RateLimitExceeded => Error::RateLimited,
        GitHubError::AuthRequired => Error::AuthRequired,
        GitHubError::Unavailable(_) => Error::Unavailable,
        GitHubError::RequestFailed(code) => Error::Http(code),
        GitHubError::Timeout => Error::Timeout,
        GitHubError::NetworkError(source) => {
            warn!(error = %source, "transport failure");
            Error::Network
        }
        GitHubError::ParseError(source) => Error::Unknown(source.to_string()),
    }
}
