//! Core functionality for the campus project
//!
//! This module contains the domain types, repository traits, and services
//! for the campus school-administration back-end: admin accounts with
//! token-based authentication, a sliding-window login throttle, and student
//! records with CSV bulk import/export.
//!
//! Storage backends implement the traits in [`repositories`]; the services
//! in [`services`] contain the business logic and are storage-agnostic.

pub mod admin;
pub mod csv;
pub mod error;
pub mod id;
pub mod repositories;
pub mod services;
pub mod student;
pub mod token;
pub mod validation;

pub use admin::{Admin, AdminId, NewAdmin};
pub use error::Error;
pub use repositories::{LoginAttempt, Page, RepositoryProvider};
pub use student::{Level, NewStudent, Student, StudentId, StudentUpdate};
pub use token::{AccessClaims, AccessToken, Role, TokenAlgorithm, TokenConfig};
