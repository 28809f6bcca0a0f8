//! Logging initialisation.
//!
//! Installs a `tracing-subscriber` formatter filtered by `RUST_LOG`
//! (default `info`), e.g. `RUST_LOG=payroll_engine=debug`.

use tracing_subscriber::{EnvFilter, fmt};

/// Installs the global subscriber.
///
/// # Examples
///
/// ```no_run
/// payroll_engine::logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .init();
}

/// Installs a debug-level subscriber that writes through the test harness.
///
/// Safe to call from every test; only the first call takes effect.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
