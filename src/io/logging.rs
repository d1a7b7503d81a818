//! Tracing subscriber setup for the command-line tool

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter directive used when `RUST_LOG` is not set
pub const fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "photomosaic=debug"
    } else {
        "photomosaic=info"
    }
}

/// Install the global subscriber writing to stderr
///
/// Returns `false` when a subscriber was already installed, in which case
/// the existing one stays in effect.
pub fn init_logging(verbose: bool) -> bool {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(verbose).into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .is_ok()
}
