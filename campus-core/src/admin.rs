//! Admin identities
//!
//! Admins are the only authenticated principals in the system. An admin is
//! identified by a unique, case-sensitive username and carries a salted
//! one-way password hash that never leaves the storage layer in clear form.

use crate::{
    Error,
    error::ValidationError,
    id::{generate_prefixed_id, validate_prefixed_id},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A unique, stable identifier for a specific admin
/// This value should be treated as opaque
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct AdminId(String);

impl AdminId {
    pub fn new(id: &str) -> Self {
        AdminId(id.to_string())
    }

    pub fn new_random() -> Self {
        AdminId(generate_prefixed_id("adm"))
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate that this ID has the correct format for an admin ID
    pub fn is_valid(&self) -> bool {
        validate_prefixed_id(&self.0, "adm")
    }
}

impl Default for AdminId {
    fn default() -> Self {
        Self::new_random()
    }
}

impl From<String> for AdminId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AdminId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for AdminId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An admin account.
///
/// The password hash is deliberately excluded from serialized output so it
/// can never appear in an API response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Admin {
    /// The unique identifier for the admin.
    pub id: AdminId,

    /// The unique, case-sensitive username.
    pub username: String,

    /// Salted one-way hash of the admin's password.
    #[serde(skip_serializing)]
    #[serde(default)]
    pub password_hash: String,

    /// The timestamp when the admin was created.
    pub created_at: DateTime<Utc>,

    /// The timestamp when the admin was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Admin {
    pub fn builder() -> AdminBuilder {
        AdminBuilder::default()
    }
}

#[derive(Default)]
pub struct AdminBuilder {
    id: Option<AdminId>,
    username: Option<String>,
    password_hash: Option<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl AdminBuilder {
    pub fn id(mut self, id: AdminId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn username(mut self, username: String) -> Self {
        self.username = Some(username);
        self
    }

    pub fn password_hash(mut self, password_hash: String) -> Self {
        self.password_hash = Some(password_hash);
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

    pub fn build(self) -> Result<Admin, Error> {
        let now = Utc::now();
        Ok(Admin {
            id: self.id.unwrap_or_default(),
            username: self.username.ok_or(ValidationError::MissingField(
                "Username is required".to_string(),
            ))?,
            password_hash: self.password_hash.ok_or(ValidationError::MissingField(
                "Password hash is required".to_string(),
            ))?,
            created_at: self.created_at.unwrap_or(now),
            updated_at: self.updated_at.unwrap_or(now),
        })
    }
}

/// Data required to persist a new admin.
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub id: AdminId,
    pub username: String,
    pub password_hash: String,
}

impl NewAdmin {
    pub fn new(username: String, password_hash: String) -> Self {
        Self {
            id: AdminId::new_random(),
            username,
            password_hash,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_id_prefixed() {
        let id = AdminId::new_random();
        assert!(id.as_str().starts_with("adm_"));
        assert!(id.is_valid());

        let id2 = AdminId::new_random();
        assert_ne!(id, id2);

        let invalid = AdminId::new("invalid");
        assert!(!invalid.is_valid());
    }

    #[test]
    fn test_builder_requires_username_and_hash() {
        let result = Admin::builder().username("admin".to_string()).build();
        assert!(result.is_err());

        let admin = Admin::builder()
            .username("admin".to_string())
            .password_hash("$argon2id$...".to_string())
            .build()
            .unwrap();
        assert_eq!(admin.username, "admin");
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let admin = Admin::builder()
            .username("admin".to_string())
            .password_hash("$argon2id$secret".to_string())
            .build()
            .unwrap();

        let json = serde_json::to_string(&admin).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("argon2id"));
    }
}
