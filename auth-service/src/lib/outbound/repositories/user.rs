use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::PhoneNumber;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserProfile;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::RepositoryError;

const USER_COLUMNS: &str = r#"
    id, email, phone, password,
    file_id, file_uri, file_thumbnail_uri,
    bank_account_name, bank_account_holder, bank_account_number,
    created_at, updated_at
"#;

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_one(&self, column: &str, value: &str) -> Result<Option<User>, RepositoryError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = $1");

        sqlx::query_as::<_, UserRow>(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?
            .map(User::try_from)
            .transpose()
    }

    async fn exists(&self, column: &str, value: &str) -> Result<bool, RepositoryError> {
        let query = format!("SELECT EXISTS (SELECT 1 FROM users WHERE {column} = $1)");

        sqlx::query_scalar::<_, bool>(&query)
            .bind(value)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, RepositoryError> {
        self.find_one("email", email.as_str()).await
    }

    async fn find_by_phone(&self, phone: &PhoneNumber) -> Result<Option<User>, RepositoryError> {
        self.find_one("phone", phone.as_str()).await
    }

    async fn email_exists(&self, email: &EmailAddress) -> Result<bool, RepositoryError> {
        self.exists("email", email.as_str()).await
    }

    async fn phone_exists(&self, phone: &PhoneNumber) -> Result<bool, RepositoryError> {
        self.exists("phone", phone.as_str()).await
    }

    async fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
        let query = format!(
            "INSERT INTO users (email, phone, password) \
             VALUES ($1, $2, $3) RETURNING {USER_COLUMNS}"
        );

        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(user.email().map(EmailAddress::as_str))
            .bind(user.phone().map(PhoneNumber::as_str))
            .bind(&user.password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_unique_violation() {
                        if db_err.constraint() == Some("users_email_key") {
                            return RepositoryError::EmailAlreadyExists(
                                user.identifier.as_str().to_string(),
                            );
                        }
                        if db_err.constraint() == Some("users_phone_key") {
                            return RepositoryError::PhoneAlreadyExists(
                                user.identifier.as_str().to_string(),
                            );
                        }
                    }
                }
                RepositoryError::Database(e.to_string())
            })?;

        User::try_from(row)
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    email: Option<String>,
    phone: Option<String>,
    password: String,
    file_id: String,
    file_uri: String,
    file_thumbnail_uri: String,
    bank_account_name: String,
    bank_account_holder: String,
    bank_account_number: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        // Rows written by other services may carry '' instead of NULL
        let email = row
            .email
            .filter(|email| !email.is_empty())
            .map(EmailAddress::new)
            .transpose()
            .map_err(|e| RepositoryError::Database(format!("user {}: stored {e}", row.id)))?;
        let phone = row
            .phone
            .filter(|phone| !phone.is_empty())
            .map(PhoneNumber::new)
            .transpose()
            .map_err(|e| RepositoryError::Database(format!("user {}: stored {e}", row.id)))?;

        Ok(User {
            id: UserId(row.id),
            email,
            phone,
            password_hash: row.password,
            profile: UserProfile {
                file_id: row.file_id,
                file_uri: row.file_uri,
                file_thumbnail_uri: row.file_thumbnail_uri,
                bank_account_name: row.bank_account_name,
                bank_account_holder: row.bank_account_holder,
                bank_account_number: row.bank_account_number,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
