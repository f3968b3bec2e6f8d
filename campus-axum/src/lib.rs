//! Axum HTTP surface for the campus back-end.
//!
//! [`create_router`] maps the domain operations onto routes and translates
//! domain errors to status codes: throttled logins surface as 429, invalid
//! credentials as 401, username conflicts as 409. All `/students` and
//! `/admins` routes sit behind bearer-token middleware.

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;
pub mod types;

pub use error::ApiError;
pub use middleware::{AppState, CallerClaims, require_auth};
pub use routes::create_router;
pub use types::ConnectionInfo;
