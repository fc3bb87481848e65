use async_trait::async_trait;

use crate::domain::user::models::AuthResult;
use crate::domain::user::models::Credentials;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::PhoneNumber;
use crate::domain::user::models::User;
use crate::user::errors::AuthError;
use crate::user::errors::RepositoryError;

/// Port for the authentication operations exposed to inbound adapters.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Authenticate by email and issue a token.
    ///
    /// # Errors
    /// * `NotFound` - No user with this email
    /// * `InvalidCredentials` - Password does not match
    /// * `Internal` - Store or signing failure
    async fn login_with_email(
        &self,
        credentials: Credentials<EmailAddress>,
    ) -> Result<AuthResult, AuthError>;

    /// Authenticate by phone and issue a token.
    ///
    /// # Errors
    /// * `NotFound` - No user with this phone
    /// * `InvalidCredentials` - Password does not match
    /// * `Internal` - Store or signing failure
    async fn login_with_phone(
        &self,
        credentials: Credentials<PhoneNumber>,
    ) -> Result<AuthResult, AuthError>;

    /// Create a user identified by email and issue a token.
    ///
    /// # Errors
    /// * `Conflict` - Email is already registered
    /// * `Internal` - Store, hashing or signing failure
    async fn register_with_email(
        &self,
        credentials: Credentials<EmailAddress>,
    ) -> Result<AuthResult, AuthError>;

    /// Create a user identified by phone and issue a token.
    ///
    /// # Errors
    /// * `Conflict` - Phone is already registered
    /// * `Internal` - Store, hashing or signing failure
    async fn register_with_phone(
        &self,
        credentials: Credentials<PhoneNumber>,
    ) -> Result<AuthResult, AuthError>;
}

/// Persistence operations for the user aggregate (the identity store).
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Retrieve user by email address.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `Database` - Database operation failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, RepositoryError>;

    /// Retrieve user by phone number.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `Database` - Database operation failed
    async fn find_by_phone(&self, phone: &PhoneNumber) -> Result<Option<User>, RepositoryError>;

    /// Check whether any user holds this email.
    ///
    /// # Errors
    /// * `Database` - Database operation failed
    async fn email_exists(&self, email: &EmailAddress) -> Result<bool, RepositoryError>;

    /// Check whether any user holds this phone.
    ///
    /// # Errors
    /// * `Database` - Database operation failed
    async fn phone_exists(&self, phone: &PhoneNumber) -> Result<bool, RepositoryError>;

    /// Persist new user to storage.
    ///
    /// Uniqueness of the identifier is enforced here, so a concurrent
    /// registration that slipped past an existence check is still rejected.
    ///
    /// # Returns
    /// Created user entity with store-assigned id and timestamps
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `PhoneAlreadyExists` - Phone is already registered
    /// * `Database` - Database operation failed
    async fn create(&self, user: NewUser) -> Result<User, RepositoryError>;
}
