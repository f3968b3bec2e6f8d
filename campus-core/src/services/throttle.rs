//! Login throttle gate.
//!
//! Sliding-window rate limiting for login attempts, keyed independently by
//! username and by source IP. The gate is consulted before any credential
//! verification: a blocked request is rejected without touching the
//! credential store, and without writing a new ledger entry.
//!
//! Counting is always derived from the persisted ledger; there is no
//! in-memory counter. The count-then-append sequence for a single request is
//! not transactional across concurrent requests, which can overshoot the
//! threshold slightly but can never under-count into a permanent bypass.
//! That tolerance is intentional; do not add locking here.

use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::repositories::LoginAttemptRepository;

/// Configuration for the login throttle.
#[derive(Debug, Clone)]
pub struct ThrottleConfig {
    /// Whether throttling is enforced at all.
    pub enabled: bool,
    /// Number of recent failures at which a key becomes blocked.
    pub max_attempts: u64,
    /// How far back failures are counted.
    pub window: Duration,
    /// How long ledger rows are retained before cleanup.
    pub retention_period: Duration,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_attempts: 5,
            window: Duration::minutes(1),
            retention_period: Duration::days(7),
        }
    }
}

impl ThrottleConfig {
    /// A configuration with throttling turned off.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

/// Service implementing the login throttle gate.
///
/// # Thread Safety
///
/// This service is thread-safe and can be shared across multiple tasks.
/// The underlying repository handles concurrent access appropriately.
pub struct LoginThrottleService<R: LoginAttemptRepository> {
    repository: Arc<R>,
    config: ThrottleConfig,
}

impl<R: LoginAttemptRepository> LoginThrottleService<R> {
    /// Create a new LoginThrottleService.
    pub fn new(repository: Arc<R>, config: ThrottleConfig) -> Self {
        Self { repository, config }
    }

    /// Get the current configuration.
    pub fn config(&self) -> &ThrottleConfig {
        &self.config
    }

    /// Check if throttling is enabled.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Decide whether a `(username, ip)` pair is currently blocked.
    ///
    /// Two independent counts over the window `(now - window, now]`: recent
    /// failures for the username across all IPs, and recent failures from
    /// the IP across all usernames. Either count reaching `max_attempts`
    /// blocks the request.
    ///
    /// A failed count query is treated as zero (fail-open): a storage hiccup
    /// must not lock out legitimate users.
    pub async fn is_blocked(&self, username: &str, ip_address: &str) -> bool {
        if !self.config.enabled {
            return false;
        }

        let since = Utc::now() - self.config.window;

        let by_username = match self
            .repository
            .count_by_username_since(username, since)
            .await
        {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!(error = %e, username, "Attempt count by username failed; failing open");
                0
            }
        };
        if by_username >= self.config.max_attempts {
            return true;
        }

        let by_ip = match self.repository.count_by_ip_since(ip_address, since).await {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!(error = %e, ip_address, "Attempt count by IP failed; failing open");
                0
            }
        };
        by_ip >= self.config.max_attempts
    }

    /// Append a failed attempt to the ledger.
    ///
    /// Side effect only: a ledger write failure is logged and swallowed so
    /// the caller's invalid-credentials response is never blocked on it.
    pub async fn record_failed_attempt(&self, username: &str, ip_address: &str) {
        if !self.config.enabled {
            return;
        }

        if let Err(e) = self.repository.record_attempt(username, ip_address).await {
            tracing::warn!(error = %e, username, ip_address, "Failed to record login attempt");
        }
    }

    /// Delete all ledger rows matching both `username` and `ip_address`.
    ///
    /// Called only after a successful authentication for that pair. Failures
    /// from other IPs of the same username, and other usernames from the
    /// same IP, remain counted. Errors are logged and swallowed: an
    /// authenticated login must not fail on a ledger delete.
    pub async fn clear_attempts(&self, username: &str, ip_address: &str) {
        match self.repository.clear_attempts(username, ip_address).await {
            Ok(cleared) if cleared > 0 => {
                tracing::debug!(username, ip_address, cleared, "Cleared login attempts");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(error = %e, username, ip_address, "Failed to clear login attempts");
            }
        }
    }

    /// Start the background retention cleanup task.
    ///
    /// Spawns a task that periodically deletes ledger rows older than the
    /// retention period. Retention is an operational concern only; the
    /// counting window never depends on it.
    pub fn start_cleanup_task(
        &self,
        mut shutdown: tokio::sync::watch::Receiver<bool>,
    ) -> tokio::task::JoinHandle<()> {
        let repository = Arc::clone(&self.repository);
        let retention = self.config.retention_period;

        const CLEANUP_INTERVAL: std::time::Duration = std::time::Duration::from_secs(3600);

        tokio::spawn(async move {
            let mut interval_timer = tokio::time::interval(CLEANUP_INTERVAL);

            loop {
                tokio::select! {
                    _ = interval_timer.tick() => {
                        let before = Utc::now() - retention;
                        match repository.cleanup_old_attempts(before).await {
                            Ok(count) if count > 0 => {
                                tracing::info!(count, "Cleaned up old login attempt records");
                            }
                            Err(e) => {
                                tracing::warn!(error = %e, "Failed to clean up login attempt records");
                            }
                            _ => {}
                        }
                    }
                    _ = shutdown.changed() => {
                        tracing::info!("Shutting down login attempt cleanup task");
                        break;
                    }
                }
            }
        })
    }
}
