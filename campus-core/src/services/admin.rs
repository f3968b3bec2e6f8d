//! Admin management service.
//!
//! Direct CRUD on admin accounts, separate from the registration flow: no
//! token is issued here. Used by already-authenticated admins managing other
//! admin accounts.

use std::sync::Arc;

use crate::{
    Error,
    admin::{Admin, AdminId, NewAdmin},
    error::{AuthError, StorageError},
    repositories::AdminRepository,
    validation::{validate_password, validate_username},
};

/// Service for admin account management.
pub struct AdminService<A: AdminRepository> {
    repository: Arc<A>,
}

impl<A: AdminRepository> AdminService<A> {
    /// Create a new AdminService with the given repository.
    pub fn new(repository: Arc<A>) -> Self {
        Self { repository }
    }

    /// Create an admin account directly.
    ///
    /// The password is hashed before it reaches storage; the clear form is
    /// dropped here.
    pub async fn create(&self, username: &str, password: &str) -> Result<Admin, Error> {
        validate_username(username)?;
        validate_password(password)?;

        if self.repository.find_by_username(username).await?.is_some() {
            return Err(AuthError::UsernameTaken.into());
        }

        let password_hash = password_auth::generate_hash(password);

        match self
            .repository
            .create(NewAdmin::new(username.to_string(), password_hash))
            .await
        {
            Ok(admin) => Ok(admin),
            Err(Error::Storage(StorageError::Constraint(_))) => {
                Err(AuthError::UsernameTaken.into())
            }
            Err(e) => Err(e),
        }
    }

    /// Look up an admin by username.
    pub async fn get_by_username(&self, username: &str) -> Result<Admin, Error> {
        self.repository
            .find_by_username(username)
            .await?
            .ok_or(Error::Storage(StorageError::NotFound))
    }

    /// Delete an admin by ID.
    pub async fn delete(&self, id: &AdminId) -> Result<(), Error> {
        let admin = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(Error::Storage(StorageError::NotFound))?;

        self.repository.delete(&admin.id).await
    }
}
