use thiserror::Error;

use crate::user::models::IdentifierKind;

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("email is required")]
    Empty,

    #[error("invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for PhoneNumber validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PhoneError {
    #[error("phone is required")]
    Empty,

    #[error("phone number must start with '+' and be followed by digits")]
    MissingPlusPrefix,

    #[error("phone number must have between 1 and {max} digits after '+'")]
    InvalidDigits { max: usize },
}

/// Error for Password policy failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("password is required")]
    Empty,

    #[error("password too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("password too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Invalid identifier or password, caught before the engine runs.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    // Value object validation errors (automatically converted via #[from])
    #[error(transparent)]
    Email(#[from] EmailError),

    #[error(transparent)]
    Phone(#[from] PhoneError),

    #[error(transparent)]
    Password(#[from] PasswordPolicyError),
}

/// Error reported by the identity store.
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    #[error("email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("phone already exists: {0}")]
    PhoneAlreadyExists(String),

    #[error("database error: {0}")]
    Database(String),
}

/// Classified outcome of a failed authentication operation.
///
/// Messages are safe to return to callers. `Internal` carries no cause;
/// the cause is logged where it happens.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0} not found")]
    NotFound(IdentifierKind),

    #[error("invalid password")]
    InvalidCredentials,

    #[error("{0} already exists")]
    Conflict(IdentifierKind),

    #[error("internal server error")]
    Internal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_messages() {
        assert_eq!(
            AuthError::NotFound(IdentifierKind::Phone).to_string(),
            "phone not found"
        );
        assert_eq!(
            AuthError::Conflict(IdentifierKind::Email).to_string(),
            "email already exists"
        );
        assert_eq!(AuthError::InvalidCredentials.to_string(), "invalid password");
        assert_eq!(AuthError::Internal.to_string(), "internal server error");
    }

    #[test]
    fn test_validation_error_is_transparent() {
        let error: AuthError = ValidationError::from(PhoneError::MissingPlusPrefix).into();
        assert_eq!(
            error.to_string(),
            "phone number must start with '+' and be followed by digits"
        );
    }
}
