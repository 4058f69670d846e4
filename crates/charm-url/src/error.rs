//! Charm URL parse errors.

/// Errors produced when parsing a charm URL.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The schema prefix is not one we know about.
    #[error("charm or bundle URL {url:?} has unrecognized schema {schema:?}")]
    UnknownSchema { url: String, schema: String },

    /// The user segment is malformed.
    #[error("charm or bundle URL {url:?} has invalid user name {user:?}")]
    InvalidUser { url: String, user: String },

    /// Local URLs cannot name a user.
    #[error("local charm or bundle URL with user name: {url:?}")]
    LocalWithUser { url: String },

    /// The series segment is malformed.
    #[error("charm or bundle URL {url:?} has invalid series {series:?}")]
    InvalidSeries { url: String, series: String },

    /// The name segment is malformed.
    #[error("charm or bundle URL {url:?} has invalid name {name:?}")]
    InvalidName { url: String, name: String },

    /// Too many or too few path segments.
    #[error("charm or bundle URL has invalid form: {url:?}")]
    InvalidForm { url: String },
}

/// Result type alias for charm URL parsing.
pub type Result<T> = std::result::Result<T, ParseError>;
