//! Blocking HTTP implementation of [`Session`].

use std::collections::HashMap;
use std::time::Duration;

use charm_url::CharmUrl;
use reqwest::blocking::Client as HttpClient;
use reqwest::header::{HeaderMap, HeaderName};
use reqwest::Url;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::params::{CharmRevision, ErrorCode, ErrorResponse, MetaAnyResponse};
use crate::session::Session;

/// Default charm store endpoint.
pub const DEFAULT_SERVER_URL: &str = "https://api.jujucharms.com/charmstore";

/// API version path segment appended to the server URL.
pub const API_VERSION: &str = "v5";

/// HTTP header used to send Juju metadata attributes to the charm store.
pub const JUJU_METADATA_HTTP_HEADER: &str = "Juju-Metadata";

/// [`JUJU_METADATA_HTTP_HEADER`] as a header name.
pub fn juju_metadata_header() -> HeaderName {
    HeaderName::from_static("juju-metadata")
}

/// Default HTTP request timeout (30 seconds).
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Parameters for creating a [`Client`].
#[derive(Debug, Clone, Default)]
pub struct Params {
    /// Root endpoint of the charm store. Defaults to [`DEFAULT_SERVER_URL`].
    pub url: Option<String>,
    /// Per-request timeout.
    pub timeout: Option<Duration>,
    /// User agent sent with every request.
    pub user_agent: Option<String>,
}

/// A charm store client speaking the v5 HTTP API.
///
/// Cloning shares the underlying connection pool but copies the stats flag
/// and header set, so [`Session::disable_stats`] and
/// [`Session::set_http_header`] on a clone leave the original alone.
#[derive(Clone)]
pub struct Client {
    http: HttpClient,
    server_url: String,
    timeout: Duration,
    stats_disabled: bool,
    header: HeaderMap,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("server_url", &self.server_url)
            .field("timeout", &self.timeout)
            .field("stats_disabled", &self.stats_disabled)
            .field("header", &self.header)
            .finish()
    }
}

impl Client {
    /// Create a client from the given parameters.
    pub fn new(params: Params) -> Result<Self> {
        let server_url = params
            .url
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let timeout = params
            .timeout
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        let user_agent = params
            .user_agent
            .unwrap_or_else(|| format!("csclient/{}", env!("CARGO_PKG_VERSION")));

        let http = HttpClient::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Client {
            http,
            server_url,
            timeout,
            stats_disabled: false,
            header: HeaderMap::new(),
        })
    }

    /// Whether requests from this client skip download statistics.
    pub fn stats_disabled(&self) -> bool {
        self.stats_disabled
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The extra headers sent with every request.
    pub fn header(&self) -> &HeaderMap {
        &self.header
    }

    /// Build the full request URL for an API path and query.
    fn request_url(&self, path: &str, query: &[(&str, String)]) -> Result<Url> {
        let raw = format!("{}/{}{}", self.server_url, API_VERSION, path);
        let mut url = Url::parse(&raw).map_err(|e| Error::InvalidUrl {
            url: raw.clone(),
            detail: e.to_string(),
        })?;
        if !query.is_empty() || self.stats_disabled {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
            if self.stats_disabled {
                pairs.append_pair("stats", "0");
            }
        }
        Ok(url)
    }

    /// GET an API path and decode the JSON response.
    fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = self.request_url(path, query)?;
        tracing::debug!(%url, stats_disabled = self.stats_disabled, "charm store request");

        let response = self.http.get(url).headers(self.header.clone()).send()?;
        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            tracing::debug!(%status, "charm store request failed");
            return Err(match serde_json::from_str::<ErrorResponse>(&body) {
                Ok(resp) => resp.into(),
                Err(_) => Error::remote(
                    ErrorCode::Other(status.as_u16().to_string()),
                    format!("unexpected response status {status}: {}", body.trim()),
                ),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

impl Session for Client {
    fn latest(&self, curls: &[CharmUrl]) -> Result<Vec<CharmRevision>> {
        if curls.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = curls
            .iter()
            .map(|curl| curl.with_revision(None).to_string())
            .collect();

        // ignore-auth keeps one private charm from failing the whole batch.
        let mut query = vec![
            ("ignore-auth", "1".to_string()),
            ("include", "id-revision".to_string()),
        ];
        query.extend(ids.iter().map(|id| ("id", id.clone())));

        let results: HashMap<String, MetaAnyResponse> = self
            .get("/meta/any", &query)
            .map_err(|e| e.context("cannot get metadata from the charm store"))?;

        // Several requested URLs may share one key once revisions are
        // stripped, so entries are looked up, never consumed.
        let revisions = ids
            .iter()
            .map(|id| match results.get(id) {
                Some(MetaAnyResponse { meta, .. }) => match &meta.id_revision {
                    Some(rev) => CharmRevision::found(rev.revision),
                    None => CharmRevision::failed(Error::remote(
                        ErrorCode::MetadataNotFound,
                        format!("no id-revision metadata for {id}"),
                    )),
                },
                None => CharmRevision::failed(
                    Error::remote(ErrorCode::NotFound, "no matching charm or bundle")
                        .context(format!("cannot resolve {id}")),
                ),
            })
            .collect();
        Ok(revisions)
    }

    fn server_url(&self) -> &str {
        &self.server_url
    }

    fn disable_stats(&mut self) {
        self.stats_disabled = true;
    }

    fn set_http_header(&mut self, header: HeaderMap) {
        self.header = header;
    }
}
