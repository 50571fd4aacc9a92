// API client for the GitHub REST surface repolens talks to
pub mod github;

pub use github::{GitHubClient, GitHubError, GitHubOwner, GitHubRepo, RepoPage};
