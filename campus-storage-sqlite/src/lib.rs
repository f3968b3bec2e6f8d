//! SQLite storage backend for campus.
//!
//! Timestamps are stored as integer unix seconds; conversion to
//! `DateTime<Utc>` happens at the repository boundary.

pub mod migrations;
pub mod repositories;

pub use repositories::{
    SqliteAdminRepository, SqliteLoginAttemptRepository, SqliteRepositoryProvider,
    SqliteStudentRepository,
};
