//! Student management service.
//!
//! CRUD, paginated listing/search/filter, and CSV bulk import/export for
//! student records.

use std::io::Read;
use std::sync::Arc;

use crate::{
    Error,
    csv::{students_from_csv, students_to_csv},
    error::StorageError,
    repositories::{Page, SortDirection, StudentRepository, StudentSortKey},
    student::{Level, NewStudent, Student, StudentId, StudentUpdate},
    validation::validate_username,
};

/// Outcome of a CSV bulk import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvImportReport {
    /// Rows persisted as new students.
    pub imported: usize,
    /// Rows skipped because the username already existed.
    pub skipped: usize,
}

/// Service for student record management.
pub struct StudentService<S: StudentRepository> {
    repository: Arc<S>,
}

impl<S: StudentRepository> StudentService<S> {
    /// Create a new StudentService with the given repository.
    pub fn new(repository: Arc<S>) -> Self {
        Self { repository }
    }

    /// Create a student.
    pub async fn create(&self, username: &str, level: Level) -> Result<Student, Error> {
        validate_username(username)?;

        if self.repository.find_by_username(username).await?.is_some() {
            return Err(StorageError::Constraint(format!(
                "username already exists: {username}"
            ))
            .into());
        }

        self.repository
            .create(NewStudent::new(username.to_string(), level))
            .await
    }

    /// Get a student by ID.
    pub async fn get(&self, id: &StudentId) -> Result<Student, Error> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(Error::Storage(StorageError::NotFound))
    }

    /// Apply a partial update to a student.
    ///
    /// A changed username is re-checked for uniqueness; an unchanged or
    /// absent username leaves the record's username alone.
    pub async fn update(&self, id: &StudentId, update: StudentUpdate) -> Result<Student, Error> {
        let mut student = self.get(id).await?;

        if let Some(username) = update.username
            && username != student.username
        {
            validate_username(&username)?;
            if self.repository.find_by_username(&username).await?.is_some() {
                return Err(StorageError::Constraint(format!(
                    "username already exists: {username}"
                ))
                .into());
            }
            student.username = username;
        }

        if let Some(level) = update.level {
            student.level = level;
        }

        self.repository.update(&student).await
    }

    /// Delete a student by ID.
    pub async fn delete(&self, id: &StudentId) -> Result<(), Error> {
        let student = self.get(id).await?;
        self.repository.delete(&student.id).await
    }

    /// List students, paginated and optionally sorted.
    pub async fn list(
        &self,
        page: u32,
        size: u32,
        sort: Option<(StudentSortKey, SortDirection)>,
    ) -> Result<Page<Student>, Error> {
        self.repository.list(page, size, sort).await
    }

    /// Case-insensitive substring search on username.
    pub async fn search(&self, query: &str, page: u32, size: u32) -> Result<Page<Student>, Error> {
        self.repository.search_by_username(query, page, size).await
    }

    /// List students at a given level.
    pub async fn filter_by_level(
        &self,
        level: Level,
        page: u32,
        size: u32,
    ) -> Result<Page<Student>, Error> {
        self.repository.find_by_level(level, page, size).await
    }

    /// Bulk-import students from CSV.
    ///
    /// Rows whose username already exists are skipped rather than treated as
    /// an error, so re-importing the same file is harmless.
    pub async fn import_csv<R: Read>(&self, reader: R) -> Result<CsvImportReport, Error> {
        let rows = students_from_csv(reader)?;

        let mut report = CsvImportReport {
            imported: 0,
            skipped: 0,
        };
        for row in rows {
            if self
                .repository
                .find_by_username(&row.username)
                .await?
                .is_some()
            {
                report.skipped += 1;
                continue;
            }
            self.repository.create(row).await?;
            report.imported += 1;
        }

        tracing::info!(
            imported = report.imported,
            skipped = report.skipped,
            "CSV student import finished"
        );
        Ok(report)
    }

    /// Export every student as CSV bytes.
    pub async fn export_csv(&self) -> Result<Vec<u8>, Error> {
        let students = self.repository.all().await?;
        students_to_csv(&students)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockStudentRepository {
        students: Mutex<Vec<Student>>,
    }

    impl MockStudentRepository {
        fn paginate(items: Vec<Student>, page: u32, size: u32) -> Page<Student> {
            let total = items.len() as u64;
            let start = (page as usize) * (size as usize);
            let items = items
                .into_iter()
                .skip(start)
                .take(size as usize)
                .collect();
            Page {
                items,
                page,
                size,
                total,
            }
        }
    }

    #[async_trait]
    impl StudentRepository for MockStudentRepository {
        async fn create(&self, new_student: NewStudent) -> Result<Student, Error> {
            let mut students = self.students.lock().unwrap();
            if students.iter().any(|s| s.username == new_student.username) {
                return Err(StorageError::Constraint("username taken".to_string()).into());
            }
            let student = Student::builder()
                .id(new_student.id)
                .username(new_student.username)
                .level(new_student.level)
                .build()?;
            students.push(student.clone());
            Ok(student)
        }

        async fn find_by_id(&self, id: &StudentId) -> Result<Option<Student>, Error> {
            Ok(self
                .students
                .lock()
                .unwrap()
                .iter()
                .find(|s| &s.id == id)
                .cloned())
        }

        async fn find_by_username(&self, username: &str) -> Result<Option<Student>, Error> {
            Ok(self
                .students
                .lock()
                .unwrap()
                .iter()
                .find(|s| s.username == username)
                .cloned())
        }

        async fn update(&self, student: &Student) -> Result<Student, Error> {
            let mut students = self.students.lock().unwrap();
            let existing = students
                .iter_mut()
                .find(|s| s.id == student.id)
                .ok_or(Error::Storage(StorageError::NotFound))?;
            *existing = student.clone();
            Ok(student.clone())
        }

        async fn delete(&self, id: &StudentId) -> Result<(), Error> {
            self.students.lock().unwrap().retain(|s| &s.id != id);
            Ok(())
        }

        async fn list(
            &self,
            page: u32,
            size: u32,
            _sort: Option<(StudentSortKey, SortDirection)>,
        ) -> Result<Page<Student>, Error> {
            let students = self.students.lock().unwrap().clone();
            Ok(Self::paginate(students, page, size))
        }

        async fn search_by_username(
            &self,
            query: &str,
            page: u32,
            size: u32,
        ) -> Result<Page<Student>, Error> {
            let query = query.to_lowercase();
            let students: Vec<_> = self
                .students
                .lock()
                .unwrap()
                .iter()
                .filter(|s| s.username.to_lowercase().contains(&query))
                .cloned()
                .collect();
            Ok(Self::paginate(students, page, size))
        }

        async fn find_by_level(
            &self,
            level: Level,
            page: u32,
            size: u32,
        ) -> Result<Page<Student>, Error> {
            let students: Vec<_> = self
                .students
                .lock()
                .unwrap()
                .iter()
                .filter(|s| s.level == level)
                .cloned()
                .collect();
            Ok(Self::paginate(students, page, size))
        }

        async fn all(&self) -> Result<Vec<Student>, Error> {
            Ok(self.students.lock().unwrap().clone())
        }
    }

    fn service() -> StudentService<MockStudentRepository> {
        StudentService::new(Arc::new(MockStudentRepository::default()))
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let service = service();

        let created = service.create("jane.doe", Level::Junior).await.unwrap();
        let fetched = service.get(&created.id).await.unwrap();
        assert_eq!(fetched.username, "jane.doe");
        assert_eq!(fetched.level, Level::Junior);
    }

    #[tokio::test]
    async fn test_create_duplicate_username() {
        let service = service();

        service.create("jane", Level::Freshman).await.unwrap();
        let result = service.create("jane", Level::Senior).await;
        assert!(matches!(
            result,
            Err(Error::Storage(StorageError::Constraint(_)))
        ));
    }

    #[tokio::test]
    async fn test_update_checks_new_username() {
        let service = service();

        service.create("jane", Level::Freshman).await.unwrap();
        let john = service.create("john", Level::Freshman).await.unwrap();

        let result = service
            .update(
                &john.id,
                StudentUpdate {
                    username: Some("jane".to_string()),
                    level: None,
                },
            )
            .await;
        assert!(matches!(
            result,
            Err(Error::Storage(StorageError::Constraint(_)))
        ));

        // Keeping the same username while changing level is fine
        let updated = service
            .update(
                &john.id,
                StudentUpdate {
                    username: Some("john".to_string()),
                    level: Some(Level::Senior),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.level, Level::Senior);
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let service = service();
        let result = service.delete(&StudentId::new_random()).await;
        assert!(matches!(
            result,
            Err(Error::Storage(StorageError::NotFound))
        ));
    }

    #[tokio::test]
    async fn test_import_skips_existing_usernames() {
        let service = service();
        service.create("jane", Level::Senior).await.unwrap();

        let csv = "username,level\njane,FRESHMAN\njohn,JUNIOR\n";
        let report = service.import_csv(csv.as_bytes()).await.unwrap();

        assert_eq!(report.imported, 1);
        assert_eq!(report.skipped, 1);

        // The pre-existing record is untouched
        let jane = service.search("jane", 0, 10).await.unwrap();
        assert_eq!(jane.items[0].level, Level::Senior);
    }

    #[tokio::test]
    async fn test_export_round_trips_through_import() {
        let service = service();
        service.create("jane", Level::Senior).await.unwrap();
        service.create("john", Level::Freshman).await.unwrap();

        let bytes = service.export_csv().await.unwrap();

        let other = self::service();
        let report = other.import_csv(bytes.as_slice()).await.unwrap();
        assert_eq!(report.imported, 2);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let service = service();
        service.create("Jane.Doe", Level::Senior).await.unwrap();

        let page = service.search("jane", 0, 10).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total, 1);
    }
}
