//! Diagnostic logging setup.
//!
//! Everything logs through `tracing`; this installs the fmt subscriber once
//! at startup. The filter comes from `FAKECHAT_LOG` (same syntax as
//! `RUST_LOG`) and defaults to `fakechat=info`.

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "FAKECHAT_LOG";
pub const DEFAULT_FILTER: &str = "fakechat=info";

/// Build the filter from the environment, falling back to [`DEFAULT_FILTER`].
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(false)
        .try_init();
}
