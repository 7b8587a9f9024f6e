//! Shared fixtures for unit tests.
//!
//! [`factories`] builds the types that recur across the test suites: a small struct, a
//! second struct with integer fields, an enum, a plain class and a generic list.


/// Routes `tracing` output of a test through the test harness' captured stdout.
///
/// Filtering follows `RUST_LOG`. Safe to call from every test; only the first call installs
/// the subscriber.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
