//! Repository trait for admin accounts.

use async_trait::async_trait;

use crate::{
    Error,
    admin::{Admin, AdminId, NewAdmin},
};

/// Repository for admin credential data.
///
/// Implementations must enforce username uniqueness at the storage layer as
/// a backstop: the service layer checks first, but the unique constraint is
/// what holds under concurrent registration.
#[async_trait]
pub trait AdminRepository: Send + Sync + 'static {
    /// Persist a new admin.
    ///
    /// Returns a constraint violation error if the username is already taken.
    async fn create(&self, new_admin: NewAdmin) -> Result<Admin, Error>;

    /// Find an admin by ID.
    async fn find_by_id(&self, id: &AdminId) -> Result<Option<Admin>, Error>;

    /// Find an admin by username (case-sensitive exact match).
    async fn find_by_username(&self, username: &str) -> Result<Option<Admin>, Error>;

    /// Delete an admin by ID. Deleting a missing admin is a no-op.
    async fn delete(&self, id: &AdminId) -> Result<(), Error>;
}
