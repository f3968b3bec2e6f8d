use crate::error::ValidationError;
use regex::Regex;
use std::sync::LazyLock;

/// Centralized validation utilities
///
/// This module provides a single source of truth for all validation logic,
/// ensuring consistent validation across the codebase.
/// Lazy-loaded username validation regex
static USERNAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").expect("Invalid username regex pattern")
});

/// Validates a username
///
/// Usernames are case-sensitive, non-empty, at most 64 characters, and
/// limited to alphanumerics plus `.`, `_` and `-` (leading character must be
/// alphanumeric).
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.is_empty() {
        return Err(ValidationError::MissingField(
            "Username is required".to_string(),
        ));
    }

    if username.len() > 64 {
        return Err(ValidationError::InvalidUsername(
            "Username is too long".to_string(),
        ));
    }

    if USERNAME_REGEX.is_match(username) {
        Ok(())
    } else {
        Err(ValidationError::InvalidUsername(format!(
            "Invalid username format: {username}"
        )))
    }
}

/// Validates a password
///
/// Passwords may not be empty or whitespace-only, and are capped at 128
/// characters to bound the cost of hashing.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::MissingField(
            "Password is required".to_string(),
        ));
    }

    if password.trim().is_empty() {
        return Err(ValidationError::InvalidPassword(
            "Password cannot be only whitespace".to_string(),
        ));
    }

    if password.len() > 128 {
        return Err(ValidationError::InvalidPassword(
            "Password is too long".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_usernames() {
        assert!(validate_username("admin").is_ok());
        assert!(validate_username("jane.doe").is_ok());
        assert!(validate_username("user_42").is_ok());
        assert!(validate_username("a").is_ok());
    }

    #[test]
    fn test_invalid_usernames() {
        assert!(validate_username("").is_err());
        assert!(validate_username(" admin").is_err());
        assert!(validate_username("admin user").is_err());
        assert!(validate_username(".leading-dot").is_err());
        assert!(validate_username(&"x".repeat(65)).is_err());
    }

    #[test]
    fn test_valid_passwords() {
        assert!(validate_password("secret").is_ok());
        assert!(validate_password("correct horse battery staple").is_ok());
    }

    #[test]
    fn test_invalid_passwords() {
        assert!(matches!(
            validate_password(""),
            Err(ValidationError::MissingField(_))
        ));
        assert!(matches!(
            validate_password("   "),
            Err(ValidationError::InvalidPassword(_))
        ));
        assert!(matches!(
            validate_password(&"p".repeat(129)),
            Err(ValidationError::InvalidPassword(_))
        ));
    }
}
