//! Tracing subscriber setup.
//!
//! Logs go to stderr. The filter comes from `WALLSLIDE_LOG`, then `RUST_LOG`,
//! and otherwise defaults to `wallslide=info` (`wallslide=debug` with
//! `--verbose`).

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Environment variable holding a filter directive for this application.
pub const LOG_ENV: &str = "WALLSLIDE_LOG";

const DEFAULT_LOG_FILTER: &str = "wallslide=info,wallslide_lib=info";
const VERBOSE_LOG_FILTER: &str = "wallslide=debug,wallslide_lib=debug";

/// Builds the filter used by [`init`].
#[must_use]
pub fn build_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(if verbose { VERBOSE_LOG_FILTER } else { DEFAULT_LOG_FILTER }))
}

/// Installs the global subscriber. Calling it again is a no-op.
pub fn init(verbose: bool) {
    let result = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(build_filter(verbose)),
        )
        .try_init();

    if result.is_err() {
        tracing::trace!("tracing subscriber already installed");
    }
}
