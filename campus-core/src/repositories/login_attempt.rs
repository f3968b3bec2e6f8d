//! Repository trait for the failed-login attempt ledger.
//!
//! The ledger is an append-only log of failed authentication attempts, each
//! tagged with the attempted username, the source IP, and a timestamp.
//! Throttling decisions are derived by counting recent rows; rows are only
//! removed in bulk, either by an explicit clear after a successful login or
//! by retention cleanup.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Error;

/// A single failed login attempt.
///
/// The username loosely references an admin but is not a foreign key:
/// attempts against non-existent usernames are recorded too, so that probing
/// for valid accounts is throttled the same as guessing passwords.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginAttempt {
    /// Storage-assigned surrogate key.
    pub id: i64,
    /// The username that was attempted (may or may not exist).
    pub username: String,
    /// Textual representation of the originating network address.
    pub ip_address: String,
    /// When the failed attempt happened.
    pub attempted_at: DateTime<Utc>,
}

/// Repository for the failed-login attempt ledger.
#[async_trait]
pub trait LoginAttemptRepository: Send + Sync + 'static {
    /// Append a failed attempt for `(username, ip)` stamped with the current time.
    ///
    /// This method does not check the throttle state - that is done
    /// separately, before any credential verification.
    async fn record_attempt(&self, username: &str, ip_address: &str)
    -> Result<LoginAttempt, Error>;

    /// Count attempts for a username strictly newer than `since`.
    async fn count_by_username_since(
        &self,
        username: &str,
        since: DateTime<Utc>,
    ) -> Result<u64, Error>;

    /// Count attempts from an IP strictly newer than `since`.
    async fn count_by_ip_since(&self, ip_address: &str, since: DateTime<Utc>)
    -> Result<u64, Error>;

    /// Delete all attempts matching both `username` and `ip_address` exactly.
    ///
    /// Called after a successful authentication for that pair. Attempts for
    /// the same username from other IPs, and for other usernames from the
    /// same IP, are left in place.
    ///
    /// Returns the number of rows deleted.
    async fn clear_attempts(&self, username: &str, ip_address: &str) -> Result<u64, Error>;

    /// Delete attempts older than `before`, regardless of username or IP.
    ///
    /// Used by periodic retention cleanup; never consulted by the throttle.
    ///
    /// Returns the number of rows deleted.
    async fn cleanup_old_attempts(&self, before: DateTime<Utc>) -> Result<u64, Error>;
}
