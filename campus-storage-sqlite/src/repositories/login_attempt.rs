//! SQLite implementation of the login-attempt ledger repository.

use async_trait::async_trait;
use campus_core::{
    Error,
    error::StorageError,
    repositories::{LoginAttempt, LoginAttemptRepository},
};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

/// SQLite repository for the failed-login attempt ledger.
pub struct SqliteLoginAttemptRepository {
    pool: SqlitePool,
}

impl SqliteLoginAttemptRepository {
    /// Create a new SQLite login attempt repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Internal struct for query results
#[derive(Debug, sqlx::FromRow)]
struct SqliteLoginAttempt {
    id: i64,
    username: String,
    ip_address: String,
    attempted_at: i64,
}

impl From<SqliteLoginAttempt> for LoginAttempt {
    fn from(row: SqliteLoginAttempt) -> Self {
        LoginAttempt {
            id: row.id,
            username: row.username,
            ip_address: row.ip_address,
            attempted_at: DateTime::from_timestamp(row.attempted_at, 0).expect("Invalid timestamp"),
        }
    }
}

#[async_trait]
impl LoginAttemptRepository for SqliteLoginAttemptRepository {
    async fn record_attempt(
        &self,
        username: &str,
        ip_address: &str,
    ) -> Result<LoginAttempt, Error> {
        let now = Utc::now().timestamp();

        let row = sqlx::query_as::<_, SqliteLoginAttempt>(
            r#"
            INSERT INTO login_attempts (username, ip_address, attempted_at)
            VALUES (?1, ?2, ?3)
            RETURNING id, username, ip_address, attempted_at
            "#,
        )
        .bind(username)
        .bind(ip_address)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to record login attempt");
            Error::Storage(StorageError::Database(
                "Failed to record login attempt".to_string(),
            ))
        })?;

        Ok(row.into())
    }

    async fn count_by_username_since(
        &self,
        username: &str,
        since: DateTime<Utc>,
    ) -> Result<u64, Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM login_attempts WHERE username = ?1 AND attempted_at > ?2",
        )
        .bind(username)
        .bind(since.timestamp())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to count attempts by username");
            Error::Storage(StorageError::Database(
                "Failed to count attempts by username".to_string(),
            ))
        })?;

        Ok(count as u64)
    }

    async fn count_by_ip_since(
        &self,
        ip_address: &str,
        since: DateTime<Utc>,
    ) -> Result<u64, Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM login_attempts WHERE ip_address = ?1 AND attempted_at > ?2",
        )
        .bind(ip_address)
        .bind(since.timestamp())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to count attempts by IP");
            Error::Storage(StorageError::Database(
                "Failed to count attempts by IP".to_string(),
            ))
        })?;

        Ok(count as u64)
    }

    async fn clear_attempts(&self, username: &str, ip_address: &str) -> Result<u64, Error> {
        let result =
            sqlx::query("DELETE FROM login_attempts WHERE username = ?1 AND ip_address = ?2")
                .bind(username)
                .bind(ip_address)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, "Failed to clear login attempts");
                    Error::Storage(StorageError::Database(
                        "Failed to clear login attempts".to_string(),
                    ))
                })?;

        Ok(result.rows_affected())
    }

    async fn cleanup_old_attempts(&self, before: DateTime<Utc>) -> Result<u64, Error> {
        let result = sqlx::query("DELETE FROM login_attempts WHERE attempted_at < ?1")
            .bind(before.timestamp())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to clean up old login attempts");
                Error::Storage(StorageError::Database(
                    "Failed to clean up old login attempts".to_string(),
                ))
            })?;

        Ok(result.rows_affected())
    }
}
