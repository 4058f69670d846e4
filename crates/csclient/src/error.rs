//! Charm store client errors.
//!
//! Errors form a cause chain through [`Error::Context`]. Callers that need to
//! know *why* something failed should look at [`Error::cause`] rather than
//! the outermost value.

use crate::params::ErrorCode;

/// Errors returned by the charm store client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An error reported by the charm store itself.
    #[error("{message}")]
    Remote { code: ErrorCode, message: String },

    /// A note wrapped around an underlying error.
    #[error("{note}")]
    Context {
        note: String,
        #[source]
        source: Box<Error>,
    },

    /// Transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The server URL could not be combined with a request path.
    #[error("invalid URL {url:?}: {detail}")]
    InvalidUrl { url: String, detail: String },

    /// An outbound header name or value was rejected.
    #[error("invalid HTTP header: {0}")]
    InvalidHeader(String),
}

impl Error {
    /// A remote-style error carrying the given code.
    pub fn remote(code: ErrorCode, message: impl Into<String>) -> Self {
        Error::Remote {
            code,
            message: message.into(),
        }
    }

    /// Wrap this error with a note, keeping it as the cause.
    pub fn context(self, note: impl Into<String>) -> Self {
        Error::Context {
            note: note.into(),
            source: Box::new(self),
        }
    }

    /// Walk through every wrapping layer and return the innermost error.
    pub fn cause(&self) -> &Error {
        let mut err = self;
        while let Error::Context { source, .. } = err {
            err = source.as_ref();
        }
        err
    }

    /// The remote error code of the cause, if the cause is a remote error.
    pub fn code(&self) -> Option<&ErrorCode> {
        match self.cause() {
            Error::Remote { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Whether the cause of this error is the store's "not found" condition.
    pub fn is_not_found(&self) -> bool {
        self.code() == Some(&ErrorCode::NotFound)
    }
}

/// Result type alias for charm store client operations.
pub type Result<T> = std::result::Result<T, Error>;
