use thiserror::Error;

/// Error type for password operations.
///
/// Verification never fails with an error; a hash that cannot be checked is a
/// mismatch.
#[derive(Debug, Clone, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),
}
