use async_trait::async_trait;

use crate::{models::Repository, Result};

/// One page of results handed back by a source: the repositories in response
/// order, plus the raw `Link` header - the only place pagination information
/// lives in the GitHub API.
#[derive(Debug, Clone, Default)]
pub struct RepositoryPage {
    pub repositories: Vec<Repository>,
    pub link_header: Option<String>,
}

/// Where repository pages come from.
///
/// The controller only ever talks to this trait, which keeps it independent
/// of any one platform client and makes it straightforward to test.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RepositorySource: Send + Sync {
    /// Fetch one page of `username`'s repositories. `page` is 1-indexed.
    async fn user_repositories(
        &self,
        username: &str,
        page: u32,
        per_page: u32,
    ) -> Result<RepositoryPage>;
}
