//! Admin login lockout policy.
//!
//! Five consecutive failures lock the account for thirty seconds. Locking
//! restarts the counter, so the next lock needs another five failures.

use crate::types::Timestamp;

/// Consecutive failures that trigger a lock.
pub const MAX_FAILED_ATTEMPTS: i32 = 5;

/// Lock duration once the threshold is reached.
pub const LOCK_DURATION_SECS: i64 = 30;

/// Lock deadline to set after a failure that brings the counter to
/// `failed_count`, if any.
pub fn lock_after_failure(failed_count: i32, now: Timestamp) -> Option<Timestamp> {
    (failed_count >= MAX_FAILED_ATTEMPTS)
        .then(|| now + chrono::Duration::seconds(LOCK_DURATION_SECS))
}

/// Seconds left on an active lock, or `None` when the account is usable.
pub fn remaining_lock_secs(locked_until: Option<Timestamp>, now: Timestamp) -> Option<i64> {
    let until = locked_until?;
    if until <= now {
        return None;
    }
    let millis = (until - now).num_milliseconds();
    Some(((millis + 999) / 1000).max(1))
}
