//! SQLite implementation of the student repository.

use async_trait::async_trait;
use campus_core::{
    Error, Level, NewStudent, Student, StudentId,
    error::StorageError,
    repositories::{Page, SortDirection, StudentRepository, StudentSortKey},
};
use chrono::DateTime;
use sqlx::SqlitePool;

/// SQLite repository for student records.
pub struct SqliteStudentRepository {
    pool: SqlitePool,
}

impl SqliteStudentRepository {
    /// Create a new SQLite student repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn count_where(&self, where_clause: &str, bind: Option<&str>) -> Result<u64, Error> {
        let sql = format!("SELECT COUNT(*) FROM students {where_clause}");
        let mut query = sqlx::query_scalar::<_, i64>(&sql);
        if let Some(value) = bind {
            query = query.bind(value);
        }
        let count = query
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Error::Storage(StorageError::Database(e.to_string())))?;
        Ok(count as u64)
    }
}

/// Internal struct for query results
#[derive(Debug, sqlx::FromRow)]
struct SqliteStudent {
    id: String,
    username: String,
    level: String,
    created_at: i64,
    updated_at: i64,
}

impl From<SqliteStudent> for Student {
    fn from(row: SqliteStudent) -> Self {
        Student {
            id: StudentId::new(&row.id),
            username: row.username,
            level: row.level.parse().expect("Invalid level value"),
            created_at: DateTime::from_timestamp(row.created_at, 0).expect("Invalid timestamp"),
            updated_at: DateTime::from_timestamp(row.updated_at, 0).expect("Invalid timestamp"),
        }
    }
}

fn order_clause(sort: Option<(StudentSortKey, SortDirection)>) -> &'static str {
    match sort {
        None => "ORDER BY created_at ASC",
        Some((key, direction)) => match (key, direction) {
            (StudentSortKey::Username, SortDirection::Asc) => "ORDER BY username ASC",
            (StudentSortKey::Username, SortDirection::Desc) => "ORDER BY username DESC",
            (StudentSortKey::Level, SortDirection::Asc) => "ORDER BY level ASC",
            (StudentSortKey::Level, SortDirection::Desc) => "ORDER BY level DESC",
            (StudentSortKey::CreatedAt, SortDirection::Asc) => "ORDER BY created_at ASC",
            (StudentSortKey::CreatedAt, SortDirection::Desc) => "ORDER BY created_at DESC",
        },
    }
}

#[async_trait]
impl StudentRepository for SqliteStudentRepository {
    async fn create(&self, new_student: NewStudent) -> Result<Student, Error> {
        let now = chrono::Utc::now().timestamp();

        let row = sqlx::query_as::<_, SqliteStudent>(
            r#"
            INSERT INTO students (id, username, level, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING id, username, level, created_at, updated_at
            "#,
        )
        .bind(new_student.id.as_str())
        .bind(&new_student.username)
        .bind(new_student.level.as_str())
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
                    new_student.username
                )))
            } else {
                tracing::error!(error = %e, "Failed to create student");
                Error::Storage(StorageError::Database(
                    "Failed to create student".to_string(),
                ))
            }
        })?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: &StudentId) -> Result<Option<Student>, Error> {
        let row = sqlx::query_as::<_, SqliteStudent>("SELECT * FROM students WHERE id = ?1")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Error::Storage(StorageError::Database(e.to_string())))?;

        Ok(row.map(Into::into))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Student>, Error> {
        let row = sqlx::query_as::<_, SqliteStudent>("SELECT * FROM students WHERE username = ?1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Error::Storage(StorageError::Database(e.to_string())))?;

        Ok(row.map(Into::into))
    }

    async fn update(&self, student: &Student) -> Result<Student, Error> {
        let now = chrono::Utc::now().timestamp();

        let row = sqlx::query_as::<_, SqliteStudent>(
            r#"
            UPDATE students
            SET username = ?2, level = ?3, updated_at = ?4
            WHERE id = ?1
            RETURNING id, username, level, created_at, updated_at
            "#,
        )
        .bind(student.id.as_str())
        .bind(&student.username)
        .bind(student.level.as_str())
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .is_some_and(|db| db.is_unique_violation())
            {
                Error::Storage(StorageError::Constraint(format!(
                    "username already exists: {}",
                    student.username
                )))
            } else {
                Error::Storage(StorageError::Database(e.to_string()))
            }
        })?;

        row.map(Into::into)
            .ok_or(Error::Storage(StorageError::NotFound))
    }

    async fn delete(&self, id: &StudentId) -> Result<(), Error> {
        sqlx::query("DELETE FROM students WHERE id = ?1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Storage(StorageError::Database(e.to_string())))?;

        Ok(())
    }

    async fn list(
        &self,
        page: u32,
        size: u32,
        sort: Option<(StudentSortKey, SortDirection)>,
    ) -> Result<Page<Student>, Error> {
        let total = self.count_where("", None).await?;

        let sql = format!(
            "SELECT * FROM students {} LIMIT ?1 OFFSET ?2",
            order_clause(sort)
        );
        let rows = sqlx::query_as::<_, SqliteStudent>(&sql)
            .bind(size as i64)
            .bind((page as i64) * (size as i64))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Error::Storage(StorageError::Database(e.to_string())))?;

        Ok(Page {
            items: rows.into_iter().map(Into::into).collect(),
            page,
            size,
            total,
        })
    }

    async fn search_by_username(
        &self,
        query: &str,
        page: u32,
        size: u32,
    ) -> Result<Page<Student>, Error> {
        // SQLite LIKE is case-insensitive for ASCII
        let total = self
            .count_where("WHERE username LIKE '%' || ?1 || '%'", Some(query))
            .await?;

        let rows = sqlx::query_as::<_, SqliteStudent>(
            r#"
            SELECT * FROM students
            WHERE username LIKE '%' || ?1 || '%'
            ORDER BY username ASC
            LIMIT ?2 OFFSET ?3
            "#,
        )
        .bind(query)
        .bind(size as i64)
        .bind((page as i64) * (size as i64))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Error::Storage(StorageError::Database(e.to_string())))?;

        Ok(Page {
            items: rows.into_iter().map(Into::into).collect(),
            page,
            size,
            total,
        })
    }

    async fn find_by_level(
        &self,
        level: Level,
        page: u32,
        size: u32,
    ) -> Result<Page<Student>, Error> {
        let total = self
            .count_where("WHERE level = ?1", Some(level.as_str()))
            .await?;

        let rows = sqlx::query_as::<_, SqliteStudent>(
            r#"
            SELECT * FROM students
            WHERE level = ?1
            ORDER BY username ASC
            LIMIT ?2 OFFSET ?3
            "#,
        )
        .bind(level.as_str())
        .bind(size as i64)
        .bind((page as i64) * (size as i64))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Error::Storage(StorageError::Database(e.to_string())))?;

        Ok(Page {
            items: rows.into_iter().map(Into::into).collect(),
            page,
            size,
            total,
        })
    }

    async fn all(&self) -> Result<Vec<Student>, Error> {
        let rows =
            sqlx::query_as::<_, SqliteStudent>("SELECT * FROM students ORDER BY username ASC")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| Error::Storage(StorageError::Database(e.to_string())))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
