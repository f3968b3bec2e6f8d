//! Repository implementations for SQLite storage

pub mod admin;
pub mod login_attempt;
pub mod student;

pub use admin::SqliteAdminRepository;
pub use login_attempt::SqliteLoginAttemptRepository;
pub use student::SqliteStudentRepository;

use async_trait::async_trait;
use campus_core::{
    Error,
    error::StorageError,
    repositories::{
        AdminRepositoryProvider, LoginAttemptRepositoryProvider, RepositoryProvider,
        StudentRepositoryProvider,
    },
};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Repository provider implementation for SQLite
///
/// This struct implements all the individual repository provider traits
/// as well as the unified `RepositoryProvider` trait.
pub struct SqliteRepositoryProvider {
    pool: SqlitePool,
    admin: Arc<SqliteAdminRepository>,
    student: Arc<SqliteStudentRepository>,
    login_attempt: Arc<SqliteLoginAttemptRepository>,
}

impl SqliteRepositoryProvider {
    pub fn new(pool: SqlitePool) -> Self {
        let admin = Arc::new(SqliteAdminRepository::new(pool.clone()));
        let student = Arc::new(SqliteStudentRepository::new(pool.clone()));
        let login_attempt = Arc::new(SqliteLoginAttemptRepository::new(pool.clone()));

        Self {
            pool,
            admin,
            student,
            login_attempt,
        }
    }
}

// Implement individual provider traits

impl AdminRepositoryProvider for SqliteRepositoryProvider {
    type AdminRepo = SqliteAdminRepository;

    fn admin(&self) -> &Self::AdminRepo {
        &self.admin
    }
}

impl StudentRepositoryProvider for SqliteRepositoryProvider {
    type StudentRepo = SqliteStudentRepository;

    fn student(&self) -> &Self::StudentRepo {
        &self.student
    }
}

impl LoginAttemptRepositoryProvider for SqliteRepositoryProvider {
    type LoginAttemptRepo = SqliteLoginAttemptRepository;

    fn login_attempt(&self) -> &Self::LoginAttemptRepo {
        &self.login_attempt
    }
}

// Implement the unified RepositoryProvider trait

#[async_trait]
impl RepositoryProvider for SqliteRepositoryProvider {
    async fn migrate(&self) -> Result<(), Error> {
        use crate::migrations::{
            CreateAdminsTable, CreateIndexes, CreateLoginAttemptsTable, CreateStudentsTable,
            SqliteMigrationManager,
        };
        use campus_migration::{Migration, MigrationManager};

        let manager = SqliteMigrationManager::new(self.pool.clone());
        manager.initialize().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to initialize migrations");
            Error::Storage(StorageError::Migration(
                "Failed to initialize migrations".to_string(),
            ))
        })?;

        let migrations: Vec<Box<dyn Migration<_>>> = vec![
            Box::new(CreateAdminsTable),
            Box::new(CreateStudentsTable),
            Box::new(CreateLoginAttemptsTable),
            Box::new(CreateIndexes),
        ];
        manager.up(&migrations).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to run migrations");
            Error::Storage(StorageError::Migration(
                "Failed to run migrations".to_string(),
            ))
        })?;

        Ok(())
    }

    async fn health_check(&self) -> Result<(), Error> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Storage(StorageError::Database(e.to_string())))?;
        Ok(())
    }
}
