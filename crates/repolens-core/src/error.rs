use thiserror::Error;

/// All the ways a fetch can go wrong, worded for the person looking at the
/// screen.
///
/// `Display` doubles as the message stored in `FetchState::error`, so the
/// variant set is the error taxonomy the UI layer can rely on.
#[derive(Error, Debug)]
pub enum Error {
    #[error("User '{0}' not found. Please check the username and try again.")]
    UserNotFound(String),

    #[error("API rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Authentication required. The API requires authentication.")]
    AuthRequired,

    #[error("GitHub is unavailable right now. Please try again later.")]
    Unavailable,

    #[error("Error: HTTP {0} - Something went wrong.")]
    Http(u16),

    #[error("Connection timed out. Please check your internet and try again.")]
    Timeout,

    #[error("Network error. Please check your internet connection.")]
    Network,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown error occurred: {0}")]
    Unknown(String),
}
