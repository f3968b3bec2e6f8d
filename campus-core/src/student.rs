//! Student records
//!
//! Students are plain directory entries: a unique username plus an academic
//! level. They never authenticate; they are managed by admins.

use crate::{
    Error,
    error::ValidationError,
    id::{generate_prefixed_id, validate_prefixed_id},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A unique, stable identifier for a specific student
/// This value should be treated as opaque
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct StudentId(String);

impl StudentId {
    pub fn new(id: &str) -> Self {
        StudentId(id.to_string())
    }

    pub fn new_random() -> Self {
        StudentId(generate_prefixed_id("stu"))
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate that this ID has the correct format for a student ID
    pub fn is_valid(&self) -> bool {
        validate_prefixed_id(&self.0, "stu")
    }
}

impl Default for StudentId {
    fn default() -> Self {
        Self::new_random()
    }
}

impl From<String> for StudentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for StudentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for StudentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Academic level of a student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Level {
    Freshman,
    Sophomore,
    Junior,
    Senior,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Freshman => "FRESHMAN",
            Level::Sophomore => "SOPHOMORE",
            Level::Junior => "JUNIOR",
            Level::Senior => "SENIOR",
        }
    }
}

impl FromStr for Level {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "FRESHMAN" => Ok(Level::Freshman),
            "SOPHOMORE" => Ok(Level::Sophomore),
            "JUNIOR" => Ok(Level::Junior),
            "SENIOR" => Ok(Level::Senior),
            other => Err(ValidationError::InvalidLevel(other.to_string())),
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A student record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    /// The unique identifier for the student.
    pub id: StudentId,

    /// The unique, case-sensitive username.
    pub username: String,

    /// The student's academic level.
    pub level: Level,

    /// The timestamp when the student was created.
    pub created_at: DateTime<Utc>,

    /// The timestamp when the student was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Student {
    pub fn builder() -> StudentBuilder {
        StudentBuilder::default()
    }
}

#[derive(Default)]
pub struct StudentBuilder {
    id: Option<StudentId>,
    username: Option<String>,
    level: Option<Level>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl StudentBuilder {
    pub fn id(mut self, id: StudentId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn username(mut self, username: String) -> Self {
        self.username = Some(username);
        self
    }

    pub fn level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    pub fn build(self) -> Result<Student, Error> {
        let now = Utc::now();
        Ok(Student {
            id: self.id.unwrap_or_default(),
            username: self.username.ok_or(ValidationError::MissingField(
                "Username is required".to_string(),
            ))?,
            level: self.level.unwrap_or(Level::Freshman),
            created_at: self.created_at.unwrap_or(now),
            updated_at: self.updated_at.unwrap_or(now),
        })
    }
}

/// Data required to persist a new student.
#[derive(Debug, Clone, Deserialize)]
pub struct NewStudent {
    #[serde(default)]
    pub id: StudentId,
    pub username: String,
    #[serde(default = "default_level")]
    pub level: Level,
}

fn default_level() -> Level {
    Level::Freshman
}

impl NewStudent {
    pub fn new(username: String, level: Level) -> Self {
        Self {
            id: StudentId::new_random(),
            username,
            level,
        }
    }
}

/// Fields of a student that may be changed after creation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentUpdate {
    pub username: Option<String>,
    pub level: Option<Level>,
}
