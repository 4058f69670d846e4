//! `charmrepo latest` — resolve the latest revision of charms.

use anyhow::{Context, Result};
use charm_url::CharmUrl;
use charmrepo::{CharmRevision, CharmStore};

/// Resolve and print the latest revision of each id.
///
/// Charms that cannot be resolved are reported inline; only a failure of the
/// whole request is an error.
pub fn run(store: &CharmStore, ids: &[String]) -> Result<()> {
    let curls = ids
        .iter()
        .map(|id| CharmUrl::parse(id).with_context(|| format!("invalid charm URL {id:?}")))
        .collect::<Result<Vec<_>>>()?;

    let results = store
        .latest(&curls)
        .context("cannot resolve latest charm revisions")?;

    print!("{}", format_results(&curls, &results));
    Ok(())
}

/// One line per charm: `<id>\t<revision>` or `<id>\terror: <message>`.
pub fn format_results(curls: &[CharmUrl], results: &[CharmRevision]) -> String {
    let mut out = String::new();
    for (curl, result) in curls.iter().zip(results) {
        let id = curl.with_revision(None);
        let line = match &result.err {
            None => format!("{id}\t{}", result.revision),
            Some(err) => format!("{id}\terror: {}", render_error(err)),
        };
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// An error followed by each of its sources, colon separated.
fn render_error(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(e) = source {
        out.push_str(": ");
        out.push_str(&e.to_string());
        source = e.source();
    }
    out
}
