use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use campus_core::error::{AuthError, Error, StorageError, TokenError};
use serde_json::json;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum ApiError {
    /// Rejected by the login throttle. Carries no detail beyond a generic
    /// retry-later message: counts and window must not be revealed.
    #[error("Too many login attempts")]
    Throttled,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Username already exists")]
    Conflict,

    #[error("Resource not found")]
    NotFound,

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Internal server error")]
    InternalError,
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Auth(AuthError::Throttled) => ApiError::Throttled,
            Error::Auth(AuthError::InvalidCredentials) => ApiError::InvalidCredentials,
            Error::Auth(AuthError::UsernameTaken) => ApiError::Conflict,
            Error::Storage(StorageError::NotFound) => ApiError::NotFound,
            Error::Storage(StorageError::Constraint(_)) => ApiError::Conflict,
            Error::Validation(e) => ApiError::BadRequest(e.to_string()),
            Error::Token(TokenError::Expired) | Error::Token(TokenError::Invalid(_)) => {
                ApiError::Unauthorized
            }
            Error::Token(TokenError::Signing(msg)) => {
                tracing::error!(error = %msg, "Token signing failed");
                ApiError::InternalError
            }
            Error::Storage(e) => {
                tracing::error!(error = %e, "Storage error");
                ApiError::InternalError
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::Throttled => (
                StatusCode::TOO_MANY_REQUESTS,
                "Too many login attempts. Try again later.".to_string(),
            ),
            ApiError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string())
            }
            ApiError::Conflict => (StatusCode::CONFLICT, "Username already exists".to_string()),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Resource not found".to_string()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            ApiError::InternalError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message,
            "code": status.as_u16()
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_mapping() {
        assert!(matches!(
            ApiError::from(Error::Auth(AuthError::Throttled)),
            ApiError::Throttled
        ));
        assert!(matches!(
            ApiError::from(Error::Auth(AuthError::InvalidCredentials)),
            ApiError::InvalidCredentials
        ));
        assert!(matches!(
            ApiError::from(Error::Auth(AuthError::UsernameTaken)),
            ApiError::Conflict
        ));
        assert!(matches!(
            ApiError::from(Error::Storage(StorageError::NotFound)),
            ApiError::NotFound
        ));
        assert!(matches!(
            ApiError::from(Error::Storage(StorageError::Constraint("dup".into()))),
            ApiError::Conflict
        ));
        assert!(matches!(
            ApiError::from(Error::Token(TokenError::Expired)),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from(Error::Storage(StorageError::Database("down".into()))),
            ApiError::InternalError
        ));
    }
}
