use thiserror::Error;

/// Failures reported by a repository implementation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Network error while refreshing '{feed}': {message}")]
    Network { feed: String, message: String },

    #[error("Failed to parse feed '{feed}': {message}")]
    Parse { feed: String, message: String },

    #[error("Repository unavailable: {0}")]
    Unavailable(String),
}
