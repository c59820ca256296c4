#![forbid(unsafe_code)]

//! Structured logging.
//!
//! BreakZone logs through `tracing`. Library code only emits events; the
//! host decides where they go. Hosts that want JSON lines without wiring up
//! a subscriber themselves can enable the `tracing-json` feature and call
//! [`init_json_logging`].
//!
//! Targets used across the workspace:
//!
//! | Target | Emitted by |
//! |--------|------------|
//! | `breakzone::registry` | transitions, registration, disposal |
//! | `breakzone::defaults` | default-table changes |

pub use tracing::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};

/// Environment variable consulted for the log filter.
pub const LOG_FILTER_ENV: &str = "BREAKZONE_LOG";

/// Install a global JSON subscriber filtered by [`LOG_FILTER_ENV`]
/// (default `info`).
///
/// Returns `false` if a global subscriber was already installed.
#[cfg(feature = "tracing-json")]
pub fn init_json_logging() -> bool {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}
