//! Structured logging with `tracing`.
//!
//! Every scamwatch crate logs through `tracing` macros with structured
//! fields (`session_id`, `tag`, `raw_score`, ...). Binaries call
//! [`init_subscriber`] once at startup; libraries never install a subscriber.

use tracing_subscriber::EnvFilter;

/// Fallback level when neither `RUST_LOG` nor configuration provides one.
pub const DEFAULT_LEVEL: &str = "warn";

/// Build the env filter: `RUST_LOG` wins, then `level`, then [`DEFAULT_LEVEL`].
fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
}

/// Initialize the global tracing subscriber with stderr output.
///
/// Call once at application startup. Subsequent calls are no-ops.
/// Output is compact, human-readable, and goes to stderr so that stdout
/// stays free for JSON event output.
pub fn init_subscriber(level: &str) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(build_filter(level))
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact();

    // try_init fails if a global subscriber is already set
    let _ = subscriber.try_init();
}

/// Initialize the global tracing subscriber with JSON lines on stderr.
///
/// Intended for log shipping; same filter rules as [`init_subscriber`].
pub fn init_json_subscriber(level: &str) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(build_filter(level))
        .with_writer(std::io::stderr)
        .json();

    let _ = subscriber.try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_subscriber_does_not_panic() {
        // Multiple calls should be safe (no-op after first)
        init_subscriber("warn");
        init_subscriber("debug");
        init_json_subscriber("info");
    }

    #[test]
    fn invalid_level_falls_back() {
        // Must not panic on a malformed directive
        let _filter = build_filter("not a [valid directive");
    }
}
