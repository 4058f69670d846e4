//! Repository error types.

/// Errors that can occur during repository operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The charm or bundle does not exist in the repository.
    #[error("{0} not found")]
    CharmNotFound(String),

    /// The store answered a batch with the wrong number of results.
    #[error("charm store returned {actual} results for {expected} charms")]
    ResultCount { expected: usize, actual: usize },

    /// Any other error from the charm store client, unchanged.
    #[error(transparent)]
    Store(#[from] csclient::Error),
}

/// Result type alias for repository operations.
pub type Result<T> = std::result::Result<T, Error>;
