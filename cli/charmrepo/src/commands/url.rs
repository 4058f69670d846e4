//! `charmrepo url` — print the charm store endpoint.

use charmrepo::CharmStore;

/// Print the root URL of the configured charm store.
pub fn run(store: &CharmStore) {
    println!("{}", store.url());
}
