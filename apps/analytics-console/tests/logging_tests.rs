#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Tests for console logging setup

use analytics_console::config::LoggingConfig;
use analytics_console::logging;

#[test]
fn test_init_with_utc_timestamps_is_idempotent() {
    let json = LoggingConfig {
        level: "debug".to_owned(),
        json: true,
    };
    logging::init(&json);
    tracing::info!(view = "job-explorer", "logged with a UTC timestamp");

    // A second subscriber is refused quietly.
    logging::init(&LoggingConfig::default());
    tracing::warn!("still logging after a repeated init");
}
