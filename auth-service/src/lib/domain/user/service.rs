use std::fmt::Display;
use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::Claims;

use crate::domain::user::models::AuthResult;
use crate::domain::user::models::Credentials;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Identifier;
use crate::domain::user::models::IdentifierKind;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::Password;
use crate::domain::user::models::PhoneNumber;
use crate::domain::user::models::User;
use crate::user::errors::AuthError;
use crate::user::errors::RepositoryError;
use crate::user::ports::AuthServicePort;
use crate::user::ports::UserRepository;

/// Domain service implementing the four authentication flows.
///
/// Holds no mutable state; concurrent calls only share the repository handle
/// and the signing configuration. Identifier uniqueness is ultimately decided
/// by the repository, the existence check before insert is a fast path.
pub struct AuthService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
    token_expiration_hours: i64,
}

impl<UR> AuthService<UR>
where
    UR: UserRepository,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Identity store implementation
    /// * `authenticator` - Password hashing and token signing
    /// * `token_expiration_hours` - Lifetime of issued tokens
    pub fn new(
        repository: Arc<UR>,
        authenticator: Arc<Authenticator>,
        token_expiration_hours: i64,
    ) -> Self {
        Self {
            repository,
            authenticator,
            token_expiration_hours,
        }
    }

    async fn login(
        &self,
        identifier: Identifier,
        password: Password,
    ) -> Result<AuthResult, AuthError> {
        let kind = identifier.kind();

        let user = match &identifier {
            Identifier::Email(email) => self.repository.find_by_email(email).await,
            Identifier::Phone(phone) => self.repository.find_by_phone(phone).await,
        }
        .map_err(|e| internal(kind, "user lookup", e))?
        .ok_or_else(|| {
            tracing::debug!(identifier_kind = %kind, "Login rejected: unknown identifier");
            AuthError::NotFound(kind)
        })?;

        let claims = Claims::for_identifier(identifier.as_str(), self.token_expiration_hours);
        let authenticator = Arc::clone(&self.authenticator);
        let password_hash = user.password_hash.clone();

        // Argon2 verification is CPU-bound
        let outcome = tokio::task::spawn_blocking(move || {
            authenticator.authenticate(password.expose(), &password_hash, &claims)
        })
        .await
        .map_err(|e| internal(kind, "password verification task", e))?;

        match outcome {
            Ok(result) => {
                tracing::info!(user_id = %user.id, identifier_kind = %kind, "User logged in");
                Ok(AuthResult::new(&user, result.access_token))
            }
            Err(AuthenticationError::InvalidCredentials) => {
                tracing::debug!(
                    user_id = %user.id,
                    identifier_kind = %kind,
                    "Login rejected: invalid password"
                );
                Err(AuthError::InvalidCredentials)
            }
            Err(AuthenticationError::JwtError(e)) => Err(internal(kind, "token signing", e)),
        }
    }

    async fn register(
        &self,
        identifier: Identifier,
        password: Password,
    ) -> Result<AuthResult, AuthError> {
        let kind = identifier.kind();

        let exists = match &identifier {
            Identifier::Email(email) => self.repository.email_exists(email).await,
            Identifier::Phone(phone) => self.repository.phone_exists(phone).await,
        }
        .map_err(|e| internal(kind, "existence check", e))?;

        if exists {
            tracing::debug!(identifier_kind = %kind, "Registration rejected: identifier taken");
            return Err(AuthError::Conflict(kind));
        }

        let password_hash = self.hash_password(kind, password).await?;

        let user = self
            .repository
            .create(NewUser {
                identifier: identifier.clone(),
                password_hash,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::EmailAlreadyExists(_) => {
                    tracing::debug!("Registration lost insert race on email");
                    AuthError::Conflict(IdentifierKind::Email)
                }
                RepositoryError::PhoneAlreadyExists(_) => {
                    tracing::debug!("Registration lost insert race on phone");
                    AuthError::Conflict(IdentifierKind::Phone)
                }
                RepositoryError::Database(_) => internal(kind, "user insert", e),
            })?;

        let token = self
            .authenticator
            .issue_token(identifier.as_str(), self.token_expiration_hours)
            .map_err(|e| internal(kind, "token signing", e))?;

        tracing::info!(user_id = %user.id, identifier_kind = %kind, "User registered");

        Ok(AuthResult::new(&user, token))
    }

    async fn hash_password(
        &self,
        kind: IdentifierKind,
        password: Password,
    ) -> Result<String, AuthError> {
        let authenticator = Arc::clone(&self.authenticator);

        tokio::task::spawn_blocking(move || authenticator.hash_password(password.expose()))
            .await
            .map_err(|e| internal(kind, "password hashing task", e))?
            .map_err(|e| internal(kind, "password hashing", e))
    }
}

/// Log the cause of an infrastructure failure and collapse it to `Internal`.
fn internal(kind: IdentifierKind, operation: &str, error: impl Display) -> AuthError {
    tracing::error!(
        identifier_kind = %kind,
        operation,
        error = %error,
        "Authentication failed with internal error"
    );
    AuthError::Internal
}

#[async_trait]
impl<UR> AuthServicePort for AuthService<UR>
where
    UR: UserRepository,
{
    async fn login_with_email(
        &self,
        credentials: Credentials<EmailAddress>,
    ) -> Result<AuthResult, AuthError> {
        self.login(credentials.identifier.into(), credentials.password)
            .await
    }

    async fn login_with_phone(
        &self,
        credentials: Credentials<PhoneNumber>,
    ) -> Result<AuthResult, AuthError> {
        self.login(credentials.identifier.into(), credentials.password)
            .await
    }

    async fn register_with_email(
        &self,
        credentials: Credentials<EmailAddress>,
    ) -> Result<AuthResult, AuthError> {
        self.register(credentials.identifier.into(), credentials.password)
            .await
    }

    async fn register_with_phone(
        &self,
        credentials: Credentials<PhoneNumber>,
    ) -> Result<AuthResult, AuthError> {
        self.register(credentials.identifier.into(), credentials.password)
            .await
    }
}
