use serde::{Deserialize, Serialize};

/// A repository as the rest of the app sees it. Identity is `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    /// "owner/name"
    pub full_name: String,
    pub owner: Owner,
    pub description: Option<String>,
    pub url: String,
    pub stars: u32,
    pub forks: u32,
    pub language: Option<String>,
    /// ISO-8601 timestamp, kept verbatim from the API. Nothing in here parses
    /// it; formatting is the consumer's business.
    pub updated_at: String,
}

/// The account a repository belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    pub id: u64,
    pub login: String,
    pub avatar_url: String,
    pub url: String,
}
