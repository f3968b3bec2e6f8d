//! SQLite implementation of the admin repository.

use async_trait::async_trait;
use campus_core::{
    Admin, AdminId, Error, NewAdmin, error::StorageError, repositories::AdminRepository,
};
use chrono::DateTime;
use sqlx::SqlitePool;

/// SQLite repository for admin accounts.
pub struct SqliteAdminRepository {
    pool: SqlitePool,
}

impl SqliteAdminRepository {
    /// Create a new SQLite admin repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Internal struct for query results
#[derive(Debug, sqlx::FromRow)]
struct SqliteAdmin {
    id: String,
    username: String,
    password_hash: String,
    created_at: i64,
    updated_at: i64,
}

impl From<SqliteAdmin> for Admin {
    fn from(row: SqliteAdmin) -> Self {
        Admin {
            id: AdminId::new(&row.id),
            username: row.username,
            password_hash: row.password_hash,
            created_at: DateTime::from_timestamp(row.created_at, 0).expect("Invalid timestamp"),
            updated_at: DateTime::from_timestamp(row.updated_at, 0).expect("Invalid timestamp"),
        }
    }
}

#[async_trait]
impl AdminRepository for SqliteAdminRepository {
    async fn create(&self, new_admin: NewAdmin) -> Result<Admin, Error> {
        let now = chrono::Utc::now().timestamp();

        let row = sqlx::query_as::<_, SqliteAdmin>(
            r#"
            INSERT INTO admins (id, username, password_hash, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING id, username, password_hash, created_at, updated_at
            "#,
        )
        .bind(new_admin.id.as_str())
        .bind(&new_admin.username)
        .bind(&new_admin.password_hash)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .is_some_and(|db| db.is_unique_violation())
            {
                Error::Storage(StorageError::Constraint(format!(
                    "username already exists: {}",
                    new_admin.username
                )))
            } else {
                tracing::error!(error = %e, "Failed to create admin");
                Error::Storage(StorageError::Database("Failed to create admin".to_string()))
            }
        })?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: &AdminId) -> Result<Option<Admin>, Error> {
        let row = sqlx::query_as::<_, SqliteAdmin>("SELECT * FROM admins WHERE id = ?1")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Error::Storage(StorageError::Database(e.to_string())))?;

        Ok(row.map(Into::into))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Admin>, Error> {
        let row = sqlx::query_as::<_, SqliteAdmin>("SELECT * FROM admins WHERE username = ?1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Error::Storage(StorageError::Database(e.to_string())))?;

        Ok(row.map(Into::into))
    }

    async fn delete(&self, id: &AdminId) -> Result<(), Error> {
        sqlx::query("DELETE FROM admins WHERE id = ?1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Storage(StorageError::Database(e.to_string())))?;

        Ok(())
    }
}
