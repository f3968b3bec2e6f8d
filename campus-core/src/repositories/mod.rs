//! Repository traits for data access layer
//!
//! This module defines the repository interfaces that services use to
//! interact with storage. These traits provide a clean abstraction over the
//! underlying storage implementation.
//!
//! The repository system uses a composable trait hierarchy:
//!
//! - Individual `*Repository` traits define the operations for each data domain
//! - Individual `*RepositoryProvider` traits provide access to each repository type
//! - [`RepositoryProvider`] is a supertrait combining all provider traits plus
//!   lifecycle methods

pub mod adapter;
pub mod admin;
pub mod login_attempt;
pub mod student;

pub use adapter::{
    AdminRepositoryAdapter, LoginAttemptRepositoryAdapter, StudentRepositoryAdapter,
};
pub use admin::AdminRepository;
pub use login_attempt::{LoginAttempt, LoginAttemptRepository};
pub use student::{Page, SortDirection, StudentRepository, StudentSortKey};

use async_trait::async_trait;

use crate::Error;

/// Provider trait for admin repository access.
pub trait AdminRepositoryProvider: Send + Sync + 'static {
    /// The admin repository implementation type
    type AdminRepo: AdminRepository;

    /// Get the admin repository
    fn admin(&self) -> &Self::AdminRepo;
}

/// Provider trait for student repository access.
pub trait StudentRepositoryProvider: Send + Sync + 'static {
    /// The student repository implementation type
    type StudentRepo: StudentRepository;

    /// Get the student repository
    fn student(&self) -> &Self::StudentRepo;
}

/// Provider trait for login attempt repository access.
pub trait LoginAttemptRepositoryProvider: Send + Sync + 'static {
    /// The login attempt repository implementation type
    type LoginAttemptRepo: LoginAttemptRepository;

    /// Get the login attempt repository
    fn login_attempt(&self) -> &Self::LoginAttemptRepo;
}

/// Provider trait that storage implementations must implement to provide all
/// repositories, plus lifecycle methods for migrations and health checks.
#[async_trait]
pub trait RepositoryProvider:
    AdminRepositoryProvider + StudentRepositoryProvider + LoginAttemptRepositoryProvider
{
    /// Run migrations for all repositories
    async fn migrate(&self) -> Result<(), Error>;

    /// Health check for all repositories
    async fn health_check(&self) -> Result<(), Error>;
}
