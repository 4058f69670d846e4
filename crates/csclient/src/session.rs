//! The session abstraction used by the repository layer.

use charm_url::CharmUrl;
use reqwest::header::HeaderMap;

use crate::error::Result;
use crate::params::CharmRevision;

/// A configured connection to a charm store.
///
/// Implementations are cheap to clone. Mutators only affect the value they
/// are called on, never other clones.
pub trait Session: Clone {
    /// Fetch the latest revision of each charm, in request order.
    ///
    /// Revisions in `curls` are ignored. A failure of the whole request is
    /// returned as `Err`; failures for individual charms are reported in the
    /// corresponding [`CharmRevision`].
    fn latest(&self, curls: &[CharmUrl]) -> Result<Vec<CharmRevision>>;

    /// Root endpoint URL of the store.
    fn server_url(&self) -> &str;

    /// Stop requests from incrementing download statistics.
    fn disable_stats(&mut self);

    /// Replace the extra headers sent with every request.
    fn set_http_header(&mut self, header: HeaderMap);
}
