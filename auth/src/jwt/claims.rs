use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// Claims carried by an issued bearer token.
///
/// `identifier` is the login key the token was issued for (an email address
/// or a phone number). Timestamps are Unix epoch seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Email or phone the holder authenticated with
    pub identifier: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// JWT ID (unique token identifier)
    pub jti: String,
}

impl Claims {
    /// Create claims for an identifier, issued now.
    ///
    /// # Arguments
    /// * `identifier` - Email or phone string
    /// * `expiration_hours` - Hours until token expires
    ///
    /// # Returns
    /// Claims with iat set to now and exp set to now + `expiration_hours`
    pub fn for_identifier(identifier: impl ToString, expiration_hours: i64) -> Self {
        Self::issued_at(identifier, Utc::now().timestamp(), expiration_hours)
    }

    /// Create claims for an identifier with an explicit issue time.
    ///
    /// # Arguments
    /// * `identifier` - Email or phone string
    /// * `issued_at` - Issue time (Unix timestamp)
    /// * `expiration_hours` - Hours until token expires
    pub fn issued_at(identifier: impl ToString, issued_at: i64, expiration_hours: i64) -> Self {
        Self {
            identifier: identifier.to_string(),
            iat: issued_at,
            // Saturates instead of overflowing on absurd lifetimes
            exp: Duration::try_hours(expiration_hours)
                .and_then(|lifetime| issued_at.checked_add(lifetime.num_seconds()))
                .unwrap_or(i64::MAX),
            jti: Uuid::new_v4().to_string(),
        }
    }
}
