//! Tracing setup shared by the CLI and the daemon.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Variable checked before `RUST_LOG`.
pub const LOG_ENV: &str = "BRAND_AUDIT_LOG";

/// Install the global subscriber.
///
/// Filtering comes from `BRAND_AUDIT_LOG`, then `RUST_LOG`, then `level`.
/// Logs go to stderr so stdout stays clean for results. With `json` set,
/// lines are newline-delimited JSON. Later calls are ignored.
pub fn init_tracing(json: bool, level: Level) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if json {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()
    };
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
