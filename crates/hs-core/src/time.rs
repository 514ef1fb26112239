//! Time utilities for hypr-sso

use std::time::{SystemTime, UNIX_EPOCH};

/// Get the current Unix timestamp in seconds.
///
/// # Panics
/// Panics if the system time is before the Unix epoch (1970-01-01),
/// which would indicate a severely misconfigured system.
///
/// # Examples
/// ```
/// use hs_core::time::current_time_secs;
///
/// let now = current_time_secs();
/// assert!(now > 0);
/// ```
pub fn current_time_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX epoch")
        .as_secs()
}

/// Seconds elapsed since a given Unix timestamp.
///
/// Returns 0 if the given time is in the future.
pub fn elapsed_secs(since: u64) -> u64 {
    current_time_secs().saturating_sub(since)
}
