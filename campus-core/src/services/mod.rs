//! Service layer for business logic
//!
//! This module contains concrete service implementations that encapsulate
//! authentication, throttling, and record management logic.

pub mod admin;
pub mod auth;
pub mod student;
pub mod throttle;

pub use admin::AdminService;
pub use auth::AuthService;
pub use student::{CsvImportReport, StudentService};
pub use throttle::{LoginThrottleService, ThrottleConfig};
