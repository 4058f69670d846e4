//! Charm and bundle identifiers.
//!
//! A charm URL names a publishable unit in a charm repository, optionally
//! pinned to a revision:
//!
//! ```text
//! cs:~user/series/name-revision
//! ```
//!
//! The revision is carried as an `Option<u32>`; `None` means "unspecified"
//! and is never rendered.

pub mod error;
pub mod url;

pub use error::{ParseError, Result};
pub use url::{CharmUrl, Schema};
