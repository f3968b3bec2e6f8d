//! Repository trait for student records.

use async_trait::async_trait;
use serde::Serialize;

use crate::{
    Error,
    student::{Level, NewStudent, Student, StudentId},
};

/// Sort key for student listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentSortKey {
    Username,
    Level,
    CreatedAt,
}

/// Sort direction for student listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// One page of results from a paginated query.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Zero-based page index.
    pub page: u32,
    /// Requested page size.
    pub size: u32,
    /// Total number of matching rows across all pages.
    pub total: u64,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Repository for student records.
#[async_trait]
pub trait StudentRepository: Send + Sync + 'static {
    /// Persist a new student.
    ///
    /// Returns a constraint violation error if the username is already taken.
    async fn create(&self, new_student: NewStudent) -> Result<Student, Error>;

    /// Find a student by ID.
    async fn find_by_id(&self, id: &StudentId) -> Result<Option<Student>, Error>;

    /// Find a student by username (case-sensitive exact match).
    async fn find_by_username(&self, username: &str) -> Result<Option<Student>, Error>;

    /// Update a student's username and level.
    async fn update(&self, student: &Student) -> Result<Student, Error>;

    /// Delete a student by ID. Deleting a missing student is a no-op.
    async fn delete(&self, id: &StudentId) -> Result<(), Error>;

    /// List students, paginated and optionally sorted.
    async fn list(
        &self,
        page: u32,
        size: u32,
        sort: Option<(StudentSortKey, SortDirection)>,
    ) -> Result<Page<Student>, Error>;

    /// Case-insensitive substring search on username, paginated.
    async fn search_by_username(
        &self,
        query: &str,
        page: u32,
        size: u32,
    ) -> Result<Page<Student>, Error>;

    /// List students at the given level, paginated.
    async fn find_by_level(
        &self,
        level: Level,
        page: u32,
        size: u32,
    ) -> Result<Page<Student>, Error>;

    /// Fetch every student, unpaginated. Used for CSV export.
    async fn all(&self) -> Result<Vec<Student>, Error>;
}
