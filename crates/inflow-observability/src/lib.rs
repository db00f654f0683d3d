//! Inflow Observability
//!
//! Structured logging setup shared by every Inflow binary.
//!
//! # Usage
//!
//! ```no_run
//! inflow_observability::init();
//!
//! tracing::info!("Service starting");
//! ```
//!
//! The log filter comes from `RUST_LOG` (default `info`). Setting
//! `INFLOW_LOG_FORMAT=json` switches the output to one JSON object per
//! line for log collectors.

use tracing_subscriber::EnvFilter;

/// Environment variable selecting the log output format.
pub const LOG_FORMAT_ENV: &str = "INFLOW_LOG_FORMAT";

/// Initialize the global tracing subscriber.
///
/// Safe to call more than once; subsequent calls leave the first
/// subscriber in place.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json = std::env::var(LOG_FORMAT_ENV)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .try_init();
    } else {
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_does_not_panic() {
        init();
    }

    #[test]
    fn test_double_init_is_safe() {
        init();
        init();
    }

    #[test]
    fn test_logging_after_init() {
        init();
        tracing::info!("Subscriber accepts events");
    }
}
