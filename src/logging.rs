//! Purpose: Tracing subscriber setup for the library and the `scopeshim` CLI.
//! Exports: `init`.
//! Invariants: Output goes to stderr; the filter comes from `SCOPESHIM_LOG` (default `warn`).
//! Invariants: Safe to call repeatedly; only the first call installs a subscriber.
use tracing_subscriber::EnvFilter;

use crate::config::LOG_ENV;

const DEFAULT_FILTER: &str = "warn";

pub fn init() {
    let env_filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_is_idempotent() {
        super::init();
        super::init();
        tracing::warn!("logging initialised twice");
    }
}
