//! Wire types exchanged with the charm store.

use std::fmt;

use serde::{Deserialize, Deserializer};

use crate::error::Error;

/// Error codes the charm store reports in error response bodies.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NotFound,
    MetadataNotFound,
    Unauthorized,
    Forbidden,
    BadRequest,
    /// Any code this client has no special handling for.
    Other(String),
}

impl ErrorCode {
    pub fn as_str(&self) -> &str {
        match self {
            ErrorCode::NotFound => "not found",
            ErrorCode::MetadataNotFound => "metadata not found",
            ErrorCode::Unauthorized => "unauthorized",
            ErrorCode::Forbidden => "forbidden",
            ErrorCode::BadRequest => "bad request",
            ErrorCode::Other(code) => code,
        }
    }
}

impl From<&str> for ErrorCode {
    fn from(s: &str) -> Self {
        match s {
            "not found" => ErrorCode::NotFound,
            "metadata not found" => ErrorCode::MetadataNotFound,
            "unauthorized" => ErrorCode::Unauthorized,
            "forbidden" => ErrorCode::Forbidden,
            "bad request" => ErrorCode::BadRequest,
            other => ErrorCode::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ErrorCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(ErrorCode::from(s.as_str()))
    }
}

/// Body of a non-2xx charm store response.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    #[serde(rename = "Message", default)]
    pub message: String,
    #[serde(rename = "Code")]
    pub code: ErrorCode,
}

impl From<ErrorResponse> for Error {
    fn from(resp: ErrorResponse) -> Self {
        Error::Remote {
            code: resp.code,
            message: resp.message,
        }
    }
}

/// One entry of a `meta/any` response, keyed by the requested id.
#[derive(Debug, Deserialize)]
pub struct MetaAnyResponse {
    #[serde(rename = "Id", default)]
    pub id: Option<String>,
    #[serde(rename = "Meta", default)]
    pub meta: MetaIncludes,
}

/// The metadata includes this client asks for.
#[derive(Debug, Default, Deserialize)]
pub struct MetaIncludes {
    #[serde(rename = "id-revision", default)]
    pub id_revision: Option<IdRevisionResponse>,
}

/// The `id-revision` metadata endpoint body.
#[derive(Debug, Deserialize)]
pub struct IdRevisionResponse {
    #[serde(rename = "Revision")]
    pub revision: i32,
}

/// The latest revision of one requested charm, or why it could not be found.
///
/// `revision` is only meaningful when `err` is `None`.
#[derive(Debug)]
pub struct CharmRevision {
    pub revision: i32,
    pub err: Option<Error>,
}

impl CharmRevision {
    /// A successful lookup.
    pub fn found(revision: i32) -> Self {
        CharmRevision {
            revision,
            err: None,
        }
    }

    /// A failed lookup.
    pub fn failed(err: Error) -> Self {
        CharmRevision {
            revision: -1,
            err: Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_strings() {
        for code in [
            ErrorCode::NotFound,
            ErrorCode::MetadataNotFound,
            ErrorCode::Unauthorized,
            ErrorCode::Forbidden,
            ErrorCode::BadRequest,
        ] {
            assert_eq!(ErrorCode::from(code.as_str()), code);
        }
        assert_eq!(
            ErrorCode::from("method not allowed"),
            ErrorCode::Other("method not allowed".into())
        );
    }

    #[test]
    fn decode_error_response() {
        let body = r#"{"Message":"no matching charm or bundle for cs:foo","Code":"not found"}"#;
        let resp: ErrorResponse = serde_json::from_str(body).unwrap();
        let err = Error::from(resp);
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "no matching charm or bundle for cs:foo");
    }

    #[test]
    fn decode_meta_any_entry() {
        let body = r#"{
            "Id": "cs:trusty/wordpress-3",
            "Meta": {"id-revision": {"Revision": 3}}
        }"#;
        let resp: MetaAnyResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.id.as_deref(), Some("cs:trusty/wordpress-3"));
        assert_eq!(resp.meta.id_revision.unwrap().revision, 3);
    }

    #[test]
    fn decode_meta_any_entry_without_includes() {
        let resp: MetaAnyResponse = serde_json::from_str(r#"{"Id":"cs:mysql-1"}"#).unwrap();
        assert!(resp.meta.id_revision.is_none());
    }
}
