//! Failed-login lockout arithmetic

use chrono::{DateTime, Duration, Utc};

/// Failed attempts before the account locks.
pub const MAX_FAILED_LOGINS: i64 = 5;

/// How long a lock lasts once triggered.
pub const LOCK_DURATION_MINUTES: i64 = 30;

/// An account is locked while the failure counter has reached the threshold
/// and the lock timestamp is still in the future. A stale `locked_until`
/// (window elapsed) no longer locks, regardless of the counter; the counter
/// resets on the next successful login.
pub fn is_account_locked(failed_attempts: i64, locked_until: Option<DateTime<Utc>>) -> bool {
    failed_attempts >= MAX_FAILED_LOGINS
        && locked_until.is_some_and(|until| until > Utc::now())
}

/// Lock expiry for an account that just hit the threshold.
pub fn calculate_lock_expiry() -> DateTime<Utc> {
    Utc::now() + Duration::minutes(LOCK_DURATION_MINUTES)
}
