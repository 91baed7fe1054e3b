//! Logging setup. Logs go to stderr so command output stays clean.

use tracing_subscriber::EnvFilter;

/// `RUST_LOG` wins; otherwise warnings only, or debug with `--verbose`.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
