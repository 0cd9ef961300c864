//! Tracing subscriber setup.
//!
//! `RUST_LOG` wins when it is set. Otherwise the configured level is used,
//! and an unrecognised level falls back to `info` instead of silencing
//! output.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

const FALLBACK_LEVEL: LevelFilter = LevelFilter::INFO;

/// Parse a bare level name such as `warn` or `DEBUG`.
fn parse_level(raw: &str) -> Option<LevelFilter> {
    raw.trim().parse::<LevelFilter>().ok()
}

/// Install the global subscriber.
pub fn init(level: &str) {
    let parsed = parse_level(level);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(parsed.unwrap_or(FALLBACK_LEVEL).into()));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    if parsed.is_none() {
        tracing::warn!(configured = level, fallback = %FALLBACK_LEVEL, "unrecognised LOG_LEVEL");
    }
}

#[cfg(test)]
#[path = "logging_test.rs"]
mod tests;
