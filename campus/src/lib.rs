//! # Campus
//!
//! Campus is a small school-administration back-end core: admin accounts
//! with token-based authentication, a sliding-window login throttle, and
//! student records with CSV bulk import/export.
//!
//! The [`Campus`] struct is the central coordinator. It wires the domain
//! services from `campus-core` to a storage backend implementing
//! [`RepositoryProvider`], and exposes the operations the HTTP layer (or any
//! other embedding) consumes.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use campus::{Campus, TokenConfig};
//! use campus_storage_sqlite::SqliteRepositoryProvider;
//!
//! #[tokio::main]
//! async fn main() {
//!     let pool = sqlx::SqlitePool::connect("sqlite::memory:").await.unwrap();
//!     let repositories = Arc::new(SqliteRepositoryProvider::new(pool));
//!
//!     let campus = Campus::new(
//!         repositories,
//!         TokenConfig::new_hs256(b"change-me-in-production".to_vec()),
//!     );
//!     campus.migrate().await.unwrap();
//! }
//! ```

use std::io::Read;
use std::sync::Arc;

use campus_core::{
    repositories::{
        AdminRepositoryAdapter, LoginAttemptRepositoryAdapter, StudentRepositoryAdapter,
    },
    services::{AdminService, AuthService, LoginThrottleService, StudentService},
};

/// Re-export core types from campus_core
///
/// These types are commonly used when working with the Campus API.
pub use campus_core::{
    AccessClaims, AccessToken, Admin, AdminId, Error, Level, LoginAttempt, RepositoryProvider,
    Role, Student, StudentId, StudentUpdate, TokenAlgorithm, TokenConfig,
};
pub use campus_core::repositories::{Page, SortDirection, StudentSortKey};
pub use campus_core::services::{CsvImportReport, ThrottleConfig};

/// Re-export storage backends
///
/// These storage implementations are available when the corresponding
/// feature is enabled.
#[cfg(feature = "sqlite")]
pub use campus_storage_sqlite::SqliteRepositoryProvider;

/// The main coordinator wiring services to a storage backend.
pub struct Campus<R: RepositoryProvider> {
    repositories: Arc<R>,
    auth_service: AuthService<AdminRepositoryAdapter<R>, LoginAttemptRepositoryAdapter<R>>,
    admin_service: AdminService<AdminRepositoryAdapter<R>>,
    student_service: StudentService<StudentRepositoryAdapter<R>>,
    throttle_service: Arc<LoginThrottleService<LoginAttemptRepositoryAdapter<R>>>,
}

impl<R: RepositoryProvider> Campus<R> {
    /// Create a new Campus instance with a repository provider and token
    /// configuration, using the default throttle policy (5 failures per
    /// 60-second window).
    pub fn new(repositories: Arc<R>, token_config: TokenConfig) -> Self {
        Self::with_throttle_config(repositories, token_config, ThrottleConfig::default())
    }

    /// Create a new Campus instance with an explicit throttle policy.
    pub fn with_throttle_config(
        repositories: Arc<R>,
        token_config: TokenConfig,
        throttle_config: ThrottleConfig,
    ) -> Self {
        let admin_repo = Arc::new(AdminRepositoryAdapter::new(repositories.clone()));
        let student_repo = Arc::new(StudentRepositoryAdapter::new(repositories.clone()));
        let attempt_repo = Arc::new(LoginAttemptRepositoryAdapter::new(repositories.clone()));

        let throttle_service = Arc::new(LoginThrottleService::new(attempt_repo, throttle_config));

        Self {
            repositories,
            auth_service: AuthService::new(
                admin_repo.clone(),
                throttle_service.clone(),
                token_config,
            ),
            admin_service: AdminService::new(admin_repo),
            student_service: StudentService::new(student_repo),
            throttle_service,
        }
    }

    /// Run migrations for all repositories
    pub async fn migrate(&self) -> Result<(), Error> {
        self.repositories.migrate().await
    }

    /// Health check for all repositories
    pub async fn health_check(&self) -> Result<(), Error> {
        self.repositories.health_check().await
    }

    /// Start the background cleanup task for old login attempt records.
    pub fn start_attempt_cleanup_task(
        &self,
        shutdown: tokio::sync::watch::Receiver<bool>,
    ) -> tokio::task::JoinHandle<()> {
        self.throttle_service.start_cleanup_task(shutdown)
    }

    // ------------------------------------------------------------------
    // Authentication
    // ------------------------------------------------------------------

    /// Register a new admin and issue an access token.
    ///
    /// Registration is login-equivalent: the returned token has the same
    /// structure and lifetime as a login token.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(Admin, AccessToken), Error> {
        self.auth_service.register(username, password).await
    }

    /// Authenticate an admin, passing through the login throttle.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        ip_address: &str,
    ) -> Result<(Admin, AccessToken), Error> {
        self.auth_service.login(username, password, ip_address).await
    }

    /// Verify a bearer token and return its claims.
    pub fn verify_token(&self, token: &AccessToken) -> Result<AccessClaims, Error> {
        self.auth_service.verify_token(token)
    }

    // ------------------------------------------------------------------
    // Admin management
    // ------------------------------------------------------------------

    /// Create an admin account without issuing a token.
    pub async fn create_admin(&self, username: &str, password: &str) -> Result<Admin, Error> {
        self.admin_service.create(username, password).await
    }

    /// Look up an admin by username.
    pub async fn get_admin_by_username(&self, username: &str) -> Result<Admin, Error> {
        self.admin_service.get_by_username(username).await
    }

    /// Delete an admin account by ID.
    pub async fn delete_admin(&self, id: &AdminId) -> Result<(), Error> {
        self.admin_service.delete(id).await
    }

    // ------------------------------------------------------------------
    // Student management
    // ------------------------------------------------------------------

    /// Create a student.
    pub async fn create_student(&self, username: &str, level: Level) -> Result<Student, Error> {
        self.student_service.create(username, level).await
    }

    /// Get a student by ID.
    pub async fn get_student(&self, id: &StudentId) -> Result<Student, Error> {
        self.student_service.get(id).await
    }

    /// Apply a partial update to a student.
    pub async fn update_student(
        &self,
        id: &StudentId,
        update: StudentUpdate,
    ) -> Result<Student, Error> {
        self.student_service.update(id, update).await
    }

    /// Delete a student by ID.
    pub async fn delete_student(&self, id: &StudentId) -> Result<(), Error> {
        self.student_service.delete(id).await
    }

    /// List students, paginated and optionally sorted.
    pub async fn list_students(
        &self,
        page: u32,
        size: u32,
        sort: Option<(StudentSortKey, SortDirection)>,
    ) -> Result<Page<Student>, Error> {
        self.student_service.list(page, size, sort).await
    }

    /// Case-insensitive substring search on student usernames.
    pub async fn search_students(
        &self,
        query: &str,
        page: u32,
        size: u32,
    ) -> Result<Page<Student>, Error> {
        self.student_service.search(query, page, size).await
    }

    /// List students at a given level.
    pub async fn filter_students_by_level(
        &self,
        level: Level,
        page: u32,
        size: u32,
    ) -> Result<Page<Student>, Error> {
        self.student_service.filter_by_level(level, page, size).await
    }

    /// Bulk-import students from CSV bytes.
    pub async fn import_students_csv<D: Read>(&self, reader: D) -> Result<CsvImportReport, Error> {
        self.student_service.import_csv(reader).await
    }

    /// Export every student as CSV bytes.
    pub async fn export_students_csv(&self) -> Result<Vec<u8>, Error> {
        self.student_service.export_csv().await
    }
}

