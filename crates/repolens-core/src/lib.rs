// Business logic lives here: models, Link header parsing, and the fetch
// state machine that the UI layer observes
pub mod config;
pub mod controller;
pub mod error;
pub mod fetch;
pub mod models;
pub mod pagination;
pub mod providers;

pub use config::Config;
pub use controller::{FetchState, RepoFetchController, PER_PAGE};
pub use error::Error;
pub use fetch::{RepositoryPage, RepositorySource};
pub use models::{Owner, Repository};
pub use providers::GitHubProvider;

/// Result type alias so the signatures stay readable
pub type Result<T> = std::result::Result<T, Error>;
