//! Logging helpers
//!
//! Library code only talks to the `log` facade; binaries pick the backend.

/// Initialize logging for tests, ignoring repeated initialization
pub fn init_for_tests() {
    let _ = env_logger::builder().is_test(true).try_init();
}
