//! Charm store backed repository.

use std::collections::HashMap;

use charm_url::CharmUrl;
use csclient::{Client, HeaderMap, HeaderValue, Params, Session};

use crate::error::{Error, Result};

/// HTTP header name used to send Juju metadata attributes to the charm store.
pub const JUJU_METADATA_HTTP_HEADER: &str = csclient::JUJU_METADATA_HTTP_HEADER;

/// The latest revision of a charm and any error encountered retrieving it.
#[derive(Debug)]
pub struct CharmRevision {
    /// Revision number. Only meaningful when `err` is `None`.
    pub revision: i32,
    pub err: Option<Error>,
}

impl CharmRevision {
    /// Convert into a `Result`, discarding the revision on error.
    pub fn into_result(self) -> Result<i32> {
        match self.err {
            Some(err) => Err(err),
            None => Ok(self.revision),
        }
    }
}

/// A charm repository backed by a charm store session.
///
/// Configuration methods return a new store and never modify the receiver.
#[derive(Debug, Clone)]
pub struct CharmStore<S = Client> {
    client: S,
}

impl CharmStore<Client> {
    /// Connect to the charm store described by `params`.
    pub fn new(params: Params) -> Result<Self> {
        Ok(CharmStore::from_session(Client::new(params)?))
    }
}

impl<S: Session> CharmStore<S> {
    /// Wrap an existing session.
    pub fn from_session(client: S) -> Self {
        CharmStore { client }
    }

    /// The underlying session.
    pub fn client(&self) -> &S {
        &self.client
    }

    /// Root endpoint URL of the charm store.
    pub fn url(&self) -> &str {
        self.client.server_url()
    }

    /// Return the most current revision for each of the given charms.
    ///
    /// The revision in each URL is ignored. Results are in the same order as
    /// `curls`. A charm the store does not know about is reported as
    /// [`Error::CharmNotFound`] in its own result; only a failure of the
    /// whole request makes this return `Err`.
    pub fn latest(&self, curls: &[CharmUrl]) -> Result<Vec<CharmRevision>> {
        let results = self.client.latest(curls)?;
        if results.len() != curls.len() {
            return Err(Error::ResultCount {
                expected: curls.len(),
                actual: results.len(),
            });
        }
        tracing::debug!(count = curls.len(), "resolved latest charm revisions");

        let revisions = curls
            .iter()
            .zip(results)
            .map(|(curl, result)| {
                let err = result.err.map(|err| {
                    if err.is_not_found() {
                        let id = curl.with_revision(None).to_string();
                        tracing::trace!(%id, cause = %err.cause(), "charm not found");
                        Error::CharmNotFound(id)
                    } else {
                        Error::Store(err)
                    }
                });
                CharmRevision {
                    revision: result.revision,
                    err,
                }
            })
            .collect();
        Ok(revisions)
    }

    /// Return a store in test mode: requests made through it do not
    /// increase charm store download statistics.
    pub fn with_test_mode(&self) -> Self {
        let mut store = self.clone();
        store.client.disable_stats();
        store
    }

    /// Return a store that sends the given attributes as
    /// [`JUJU_METADATA_HTTP_HEADER`] values, one `key=value` entry per pair.
    ///
    /// Fails if a pair cannot be carried in an HTTP header value.
    pub fn with_juju_attrs(&self, attrs: &HashMap<String, String>) -> Result<Self> {
        let name = csclient::juju_metadata_header();
        let mut header = HeaderMap::new();
        for (key, value) in attrs {
            let entry = format!("{key}={value}");
            let value = HeaderValue::from_str(&entry)
                .map_err(|e| csclient::Error::InvalidHeader(format!("{entry:?}: {e}")))?;
            header.append(name.clone(), value);
        }

        let mut store = self.clone();
        store.client.set_http_header(header);
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use csclient::ErrorCode;

    use super::*;

    type Responder = fn(&[CharmUrl]) -> csclient::Result<Vec<csclient::CharmRevision>>;

    /// In-memory session returning canned results.
    #[derive(Debug, Clone)]
    struct FakeSession {
        respond: Responder,
        stats_disabled: bool,
        header: HeaderMap,
        calls: Rc<RefCell<Vec<Vec<CharmUrl>>>>,
    }

    impl FakeSession {
        fn new(respond: Responder) -> Self {
            FakeSession {
                respond,
                stats_disabled: false,
                header: HeaderMap::new(),
                calls: Rc::default(),
            }
        }
    }

    impl Session for FakeSession {
        fn latest(&self, curls: &[CharmUrl]) -> csclient::Result<Vec<csclient::CharmRevision>> {
            self.calls.borrow_mut().push(curls.to_vec());
            (self.respond)(curls)
        }

        fn server_url(&self) -> &str {
            "https://charmstore.example.com"
        }

        fn disable_stats(&mut self) {
            self.stats_disabled = true;
        }

        fn set_http_header(&mut self, header: HeaderMap) {
            self.header = header;
        }
    }

    fn curls(ids: &[&str]) -> Vec<CharmUrl> {
        ids.iter().map(|s| CharmUrl::parse(s).unwrap()).collect()
    }

    fn not_found() -> csclient::Error {
        csclient::Error::remote(ErrorCode::NotFound, "no matching charm or bundle")
    }

    fn metadata_values(header: &HeaderMap) -> Vec<String> {
        header
            .get_all(csclient::juju_metadata_header())
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn url_comes_from_session() {
        let store = CharmStore::from_session(FakeSession::new(|_| Ok(Vec::new())));
        assert_eq!(store.url(), "https://charmstore.example.com");
    }

    #[test]
    fn latest_remaps_wrapped_not_found_and_keeps_order() {
        let store = CharmStore::from_session(FakeSession::new(|_| {
            Ok(vec![
                csclient::CharmRevision::failed(not_found().context("cannot resolve pkg-x")),
                csclient::CharmRevision::found(7),
            ])
        }));

        let ids = curls(&["cs:trusty/pkg-x-3", "cs:trusty/pkg-y"]);
        let results = store.latest(&ids).unwrap();

        assert_eq!(results.len(), 2);
        match &results[0].err {
            Some(Error::CharmNotFound(id)) => assert_eq!(id, "cs:trusty/pkg-x"),
            other => panic!("expected CharmNotFound, got {other:?}"),
        }
        assert_eq!(
            results[0].err.as_ref().unwrap().to_string(),
            "cs:trusty/pkg-x not found"
        );
        assert_eq!(results[1].revision, 7);
        assert!(results[1].err.is_none());

        // The session sees the identifiers exactly as given.
        assert_eq!(store.client().calls.borrow()[0], ids);
    }

    #[test]
    fn latest_remaps_direct_not_found() {
        let store = CharmStore::from_session(FakeSession::new(|_| {
            Ok(vec![csclient::CharmRevision::failed(not_found())])
        }));
        let results = store.latest(&curls(&["cs:~bob/xenial/wordpress-42"])).unwrap();
        assert_eq!(
            results[0].err.as_ref().unwrap().to_string(),
            "cs:~bob/xenial/wordpress not found"
        );
    }

    #[test]
    fn not_found_message_has_no_revision_when_none_given() {
        let store = CharmStore::from_session(FakeSession::new(|_| {
            Ok(vec![csclient::CharmRevision::failed(not_found())])
        }));
        let results = store.latest(&curls(&["cs:mysql"])).unwrap();
        assert_eq!(
            results[0].err.as_ref().unwrap().to_string(),
            "cs:mysql not found"
        );
    }

    #[test]
    fn latest_passes_other_errors_through() {
        let store = CharmStore::from_session(FakeSession::new(|_| {
            Ok(vec![
                csclient::CharmRevision::failed(
                    csclient::Error::remote(ErrorCode::Forbidden, "access denied")
                        .context("cannot resolve cs:secret"),
                ),
                csclient::CharmRevision::found(1),
            ])
        }));

        let results = store.latest(&curls(&["cs:secret-5", "cs:public"])).unwrap();
        match results[0].err.as_ref().unwrap() {
            Error::Store(err) => {
                assert!(matches!(err, csclient::Error::Context { .. }));
                assert_eq!(err.code(), Some(&ErrorCode::Forbidden));
                assert_eq!(err.to_string(), "cannot resolve cs:secret");
                assert_eq!(err.cause().to_string(), "access denied");
            }
            other => panic!("expected Store error, got {other:?}"),
        }
        assert_eq!(results[0].revision, -1);
        assert!(results[1].err.is_none());
    }

    #[test]
    fn latest_partial_failure_still_succeeds() {
        let store = CharmStore::from_session(FakeSession::new(|curls| {
            Ok(curls
                .iter()
                .map(|_| csclient::CharmRevision::failed(not_found()))
                .collect())
        }));
        let results = store.latest(&curls(&["cs:a", "cs:b", "cs:c"])).unwrap();
        let messages: Vec<String> = results
            .into_iter()
            .map(|r| r.into_result().unwrap_err().to_string())
            .collect();
        assert_eq!(
            messages,
            vec!["cs:a not found", "cs:b not found", "cs:c not found"]
        );
    }

    #[test]
    fn latest_success_returns_session_revisions() {
        let store = CharmStore::from_session(FakeSession::new(|curls| {
            Ok(curls
                .iter()
                .enumerate()
                .map(|(i, _)| csclient::CharmRevision::found(i as i32 * 10))
                .collect())
        }));
        let results = store
            .latest(&curls(&["cs:a-1", "cs:b-2", "cs:c-3", "cs:d"]))
            .unwrap();
        let revisions: Vec<i32> = results.into_iter().map(|r| r.into_result().unwrap()).collect();
        assert_eq!(revisions, vec![0, 10, 20, 30]);
    }

    #[test]
    fn latest_repeated_charms_map_to_their_own_positions() {
        // Answers by name only, the way the store keys results.
        let store = CharmStore::from_session(FakeSession::new(|curls| {
            Ok(curls
                .iter()
                .map(|curl| match curl.name.as_str() {
                    "wordpress" => csclient::CharmRevision::found(3),
                    _ => csclient::CharmRevision::failed(
                        not_found().context(format!("cannot resolve {curl}")),
                    ),
                })
                .collect())
        }));

        let ids = curls(&[
            "cs:trusty/wordpress-1",
            "cs:trusty/missing-4",
            "cs:trusty/wordpress-2",
            "cs:trusty/missing",
            "cs:trusty/wordpress",
        ]);
        let results = store.latest(&ids).unwrap();

        assert_eq!(results.len(), ids.len());
        for i in [0, 2, 4] {
            assert!(results[i].err.is_none(), "position {i}: {:?}", results[i].err);
            assert_eq!(results[i].revision, 3);
        }
        for i in [1, 3] {
            assert_eq!(
                results[i].err.as_ref().unwrap().to_string(),
                "cs:trusty/missing not found"
            );
        }
    }

    #[test]
    fn latest_with_no_ids() {
        let store = CharmStore::from_session(FakeSession::new(|_| Ok(Vec::new())));
        assert!(store.latest(&[]).unwrap().is_empty());
    }

    #[test]
    fn latest_propagates_whole_batch_failure() {
        let store = CharmStore::from_session(FakeSession::new(|_| {
            Err(not_found().context("cannot get metadata from the charm store"))
        }));
        let err = store.latest(&curls(&["cs:a", "cs:b"])).unwrap_err();
        // A whole-batch failure is never remapped to a per-charm error.
        match err {
            Error::Store(err) => assert!(err.is_not_found()),
            other => panic!("expected Store error, got {other:?}"),
        }
    }

    #[test]
    fn latest_rejects_mismatched_result_count() {
        let store = CharmStore::from_session(FakeSession::new(|_| {
            Ok(vec![csclient::CharmRevision::found(1)])
        }));
        let err = store.latest(&curls(&["cs:a", "cs:b"])).unwrap_err();
        assert!(matches!(
            err,
            Error::ResultCount {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn with_test_mode_leaves_receiver_alone() {
        let store = CharmStore::from_session(FakeSession::new(|_| Ok(Vec::new())));
        let test_store = store.with_test_mode();
        assert!(test_store.client().stats_disabled);
        assert!(!store.client().stats_disabled);
    }

    #[test]
    fn with_test_mode_on_http_client() {
        let store = CharmStore::new(Params::default()).unwrap();
        let test_store = store.with_test_mode();
        assert!(test_store.client().stats_disabled());
        assert!(!store.client().stats_disabled());
        assert_eq!(test_store.url(), store.url());
    }

    #[test]
    fn with_juju_attrs_sets_one_value_per_pair() {
        let store = CharmStore::from_session(FakeSession::new(|_| Ok(Vec::new())));
        let attrs: HashMap<String, String> = [("a", "1"), ("b", "2")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        let derived = store.with_juju_attrs(&attrs).unwrap();

        let mut values = metadata_values(&derived.client().header);
        values.sort();
        assert_eq!(values, vec!["a=1", "b=2"]);
        assert_eq!(derived.client().header.len(), 2);
        assert!(store.client().header.is_empty());
    }

    #[test]
    fn with_juju_attrs_replaces_previous_attrs() {
        let store = CharmStore::from_session(FakeSession::new(|_| Ok(Vec::new())));
        let first: HashMap<String, String> = [("env".to_string(), "prod".to_string())].into();
        let second: HashMap<String, String> = [("cloud".to_string(), "aws".to_string())].into();

        let with_first = store.with_juju_attrs(&first).unwrap();
        let with_second = with_first.with_juju_attrs(&second).unwrap();

        assert_eq!(metadata_values(&with_first.client().header), vec!["env=prod"]);
        assert_eq!(metadata_values(&with_second.client().header), vec!["cloud=aws"]);
    }

    #[test]
    fn with_juju_attrs_rejects_unsendable_values() {
        let store = CharmStore::from_session(FakeSession::new(|_| Ok(Vec::new())));
        let attrs: HashMap<String, String> = [("bad".to_string(), "line\nbreak".to_string())].into();
        let err = store.with_juju_attrs(&attrs).unwrap_err();
        assert!(matches!(err, Error::Store(csclient::Error::InvalidHeader(_))));
    }

    #[test]
    fn derived_stores_are_independent() {
        let store = CharmStore::from_session(FakeSession::new(|_| Ok(Vec::new())));
        let attrs: HashMap<String, String> = [("a".to_string(), "1".to_string())].into();
        let combined = store.with_test_mode().with_juju_attrs(&attrs).unwrap();

        assert!(combined.client().stats_disabled);
        assert_eq!(metadata_values(&combined.client().header), vec!["a=1"]);
        assert!(!store.client().stats_disabled);
        assert!(store.client().header.is_empty());
    }
}
