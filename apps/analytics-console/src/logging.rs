//! Console log output on stderr

use std::io::IsTerminal;

use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Install the global subscriber
///
/// `RUST_LOG` wins over the configured level. Calling this twice is a no-op.
pub fn init(cfg: &LoggingConfig) {
    let env = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cfg.level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let json_layer = cfg.json.then(|| {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
    });
    let text_layer = (!cfg.json).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(std::io::stderr().is_terminal())
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
    });

    let subscriber = Registry::default()
        .with(env)
        .with(json_layer)
        .with(text_layer);

    _ = subscriber.try_init();
}
