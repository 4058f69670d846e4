//! Logging setup for the CLI.

use tracing_subscriber::EnvFilter;

/// Install a stderr subscriber filtered by `RUST_LOG`.
///
/// Without `RUST_LOG` only warnings are shown, or debug output when
/// `verbose` is set.
pub fn init(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // A subscriber may already be installed when embedded in tests.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
