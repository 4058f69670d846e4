//! Client for the charm store HTTP API.
//!
//! The [`Session`] trait is the seam the repository layer talks through; the
//! [`Client`] type implements it over blocking HTTP. Sessions are plain
//! values: configuration mutators take `&mut self`, so a derived
//! configuration is produced by cloning first and mutating the clone.

pub mod client;
pub mod error;
pub mod params;
pub mod session;

pub use client::{
    juju_metadata_header, Client, Params, API_VERSION, DEFAULT_SERVER_URL,
    JUJU_METADATA_HTTP_HEADER,
};
pub use error::{Error, Result};
pub use params::{CharmRevision, ErrorCode};
pub use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
pub use session::Session;
