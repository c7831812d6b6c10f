//! Logging setup for the command-line driver.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the binary (or to the embedding application).

use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when the requested directive does not parse.
const FALLBACK_FILTER: &str = "info";

/// Install a stdout subscriber.
///
/// # Arguments
/// - `level`: filter directive ("info", "debug", "image_preprocess=trace", ...)
/// - `json`: emit JSON lines instead of text
///
/// # Returns
/// `false` if a global subscriber was already installed or `level` is not a
/// valid directive (in which case "info" is used).
pub fn init_logging(level: &str, json: bool) -> bool {
    let (env_filter, directive, valid) = parse_filter(level);

    let subscriber = tracing_subscriber::registry().with(env_filter);
    let result = if json {
        subscriber.with(fmt::layer().json()).try_init()
    } else {
        subscriber
            .with(fmt::layer().with_target(true).with_line_number(true))
            .try_init()
    };

    if result.is_err() {
        return false;
    }

    if !valid {
        warn!(rejected = level, "invalid log filter, falling back to {FALLBACK_FILTER}");
    }
    info!(
        filter = directive,
        format = if json { "json" } else { "text" },
        "logging initialized"
    );
    valid
}

/// Parse `level`, falling back to [`FALLBACK_FILTER`]. Returns the filter,
/// the directive it was built from and whether `level` was accepted.
fn parse_filter(level: &str) -> (EnvFilter, &str, bool) {
    match EnvFilter::try_new(level) {
        Ok(filter) => (filter, level, true),
        Err(_) => (EnvFilter::new(FALLBACK_FILTER), FALLBACK_FILTER, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_twice() {
        // Another test may already own the global subscriber; the second
        // call must fail gracefully either way.
        let _ = init_logging("debug", false);
        assert!(!init_logging("info", true));

        tracing::info!("test log message");
    }

    #[test]
    fn test_invalid_directive_reports_fallback() {
        let (_, directive, valid) = parse_filter("image_preprocess=debug");
        assert_eq!(directive, "image_preprocess=debug");
        assert!(valid);

        let (_, directive, valid) = parse_filter("image_preprocess=notalevel");
        assert_eq!(directive, "info");
        assert!(!valid);
    }
}
