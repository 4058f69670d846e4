//! CLI command implementations.

pub mod latest;
pub mod url;

use std::collections::HashMap;

use anyhow::{Context, Result};
use charmrepo::CharmStore;

use crate::config::CliConfig;

/// Open a charm store from the configuration, applying command-line overrides.
///
/// `extra_attrs` are merged over the configured `[attributes]`.
pub fn open_store(
    config: &CliConfig,
    test_mode: bool,
    extra_attrs: &[(String, String)],
) -> Result<CharmStore> {
    let mut store =
        CharmStore::new(config.params()).context("cannot create charm store client")?;

    if test_mode || config.store.test_mode {
        store = store.with_test_mode();
    }

    let mut attrs: HashMap<String, String> = config.attributes.clone();
    attrs.extend(extra_attrs.iter().cloned());
    if !attrs.is_empty() {
        store = store
            .with_juju_attrs(&attrs)
            .context("invalid metadata attribute")?;
    }

    tracing::debug!(url = store.url(), attrs = attrs.len(), "opened charm store");
    Ok(store)
}

/// Parse a `key=value` attribute from the command line.
pub fn parse_attr(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got {s:?}")),
    }
}
