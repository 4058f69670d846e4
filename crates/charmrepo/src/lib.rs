//! Charm repository access.
//!
//! [`CharmStore`] wraps a charm store [`Session`](csclient::Session) and
//! resolves the latest revision of charms in batches. Per-charm failures are
//! reported alongside each result instead of failing the whole batch.

pub mod charmstore;
pub mod error;

pub use charmstore::{CharmRevision, CharmStore, JUJU_METADATA_HTTP_HEADER};
pub use error::{Error, Result};
