//! Adapters that wrap a [`RepositoryProvider`] and implement the individual
//! repository traits, so services can be built generically over any provider.

use crate::{
    Error,
    admin::{Admin, AdminId, NewAdmin},
    repositories::{
        AdminRepository, LoginAttempt, LoginAttemptRepository, Page, RepositoryProvider,
        SortDirection, StudentRepository, StudentSortKey,
    },
    student::{Level, NewStudent, Student, StudentId},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

pub struct AdminRepositoryAdapter<R: RepositoryProvider> {
    provider: Arc<R>,
}

impl<R: RepositoryProvider> AdminRepositoryAdapter<R> {
    pub fn new(provider: Arc<R>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<R: RepositoryProvider> AdminRepository for AdminRepositoryAdapter<R> {
    async fn create(&self, new_admin: NewAdmin) -> Result<Admin, Error> {
        self.provider.admin().create(new_admin).await
    }

    async fn find_by_id(&self, id: &AdminId) -> Result<Option<Admin>, Error> {
        self.provider.admin().find_by_id(id).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Admin>, Error> {
        self.provider.admin().find_by_username(username).await
    }

    async fn delete(&self, id: &AdminId) -> Result<(), Error> {
        self.provider.admin().delete(id).await
    }
}

pub struct StudentRepositoryAdapter<R: RepositoryProvider> {
    provider: Arc<R>,
}

impl<R: RepositoryProvider> StudentRepositoryAdapter<R> {
    pub fn new(provider: Arc<R>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<R: RepositoryProvider> StudentRepository for StudentRepositoryAdapter<R> {
    async fn create(&self, new_student: NewStudent) -> Result<Student, Error> {
        self.provider.student().create(new_student).await
    }

    async fn find_by_id(&self, id: &StudentId) -> Result<Option<Student>, Error> {
        self.provider.student().find_by_id(id).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Student>, Error> {
        self.provider.student().find_by_username(username).await
    }

    async fn update(&self, student: &Student) -> Result<Student, Error> {
        self.provider.student().update(student).await
    }

    async fn delete(&self, id: &StudentId) -> Result<(), Error> {
        self.provider.student().delete(id).await
    }

    async fn list(
        &self,
        page: u32,
        size: u32,
        sort: Option<(StudentSortKey, SortDirection)>,
    ) -> Result<Page<Student>, Error> {
        self.provider.student().list(page, size, sort).await
    }

    async fn search_by_username(
        &self,
        query: &str,
        page: u32,
        size: u32,
    ) -> Result<Page<Student>, Error> {
        self.provider
            .student()
            .search_by_username(query, page, size)
            .await
    }

    async fn find_by_level(
        &self,
        level: Level,
        page: u32,
        size: u32,
    ) -> Result<Page<Student>, Error> {
        self.provider
            .student()
            .find_by_level(level, page, size)
            .await
    }

    async fn all(&self) -> Result<Vec<Student>, Error> {
        self.provider.student().all().await
    }
}

pub struct LoginAttemptRepositoryAdapter<R: RepositoryProvider> {
    provider: Arc<R>,
}

impl<R: RepositoryProvider> LoginAttemptRepositoryAdapter<R> {
    pub fn new(provider: Arc<R>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<R: RepositoryProvider> LoginAttemptRepository for LoginAttemptRepositoryAdapter<R> {
    async fn record_attempt(
        &self,
        username: &str,
        ip_address: &str,
    ) -> Result<LoginAttempt, Error> {
        self.provider
            .login_attempt()
            .record_attempt(username, ip_address)
            .await
    }

    async fn count_by_username_since(
        &self,
        username: &str,
        since: DateTime<Utc>,
    ) -> Result<u64, Error> {
        self.provider
            .login_attempt()
            .count_by_username_since(username, since)
            .await
    }

    async fn count_by_ip_since(
        &self,
        ip_address: &str,
        since: DateTime<Utc>,
    ) -> Result<u64, Error> {
        self.provider
            .login_attempt()
            .count_by_ip_since(ip_address, since)
            .await
    }

    async fn clear_attempts(&self, username: &str, ip_address: &str) -> Result<u64, Error> {
        self.provider
            .login_attempt()
            .clear_attempts(username, ip_address)
            .await
    }

    async fn cleanup_old_attempts(&self, before: DateTime<Utc>) -> Result<u64, Error> {
        self.provider
            .login_attempt()
            .cleanup_old_attempts(before)
            .await
    }
}
