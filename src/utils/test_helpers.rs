//! Shared setup for unit and integration tests.

use std::sync::Once;

static LOGGING_INIT: Once = Once::new();

/// Routes `tracing` output through the test harness, filtered by `RUST_LOG`.
///
/// Safe to call from every test; only the first call installs the subscriber.
pub fn setup_test_logging() {
    LOGGING_INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Returns true when the current process runs as root (UID 0), where permission bits
/// do not stop reads. Tests that rely on unreadable files skip themselves then.
#[cfg(any(test, doctest))]
#[inline]
pub fn running_as_root() -> bool {
    #[cfg(unix)]
    {
        // SAFETY: geteuid has no preconditions and cannot fail.
        unsafe { libc::geteuid() == 0 }
    }
    #[cfg(not(unix))]
    {
        false
    }
}
