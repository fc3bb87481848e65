use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::user::models::AuthResult;
use crate::domain::user::models::Credentials;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::PhoneNumber;
use crate::user::errors::AuthError;
use crate::user::errors::ValidationError;

pub mod login_with_email;
pub mod login_with_phone;
pub mod register_with_email;
pub mod register_with_phone;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<T>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(data))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };

        (status, Json(ApiErrorBody { error: message })).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation(_) => ApiError::BadRequest(err.to_string()),
            // Unknown identifier and wrong password share a status
            AuthError::NotFound(_) | AuthError::InvalidCredentials => {
                ApiError::NotFound(err.to_string())
            }
            AuthError::Conflict(_) => ApiError::Conflict(err.to_string()),
            AuthError::Internal => ApiError::InternalServerError(err.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorBody {
    pub error: String,
}

/// HTTP request body for email login and registration (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EmailCredentialsRequest {
    email: String,
    password: String,
}

impl EmailCredentialsRequest {
    fn try_into_credentials(self) -> Result<Credentials<EmailAddress>, ValidationError> {
        let email = EmailAddress::new(self.email)?;
        let password = Password::new(self.password)?;
        Ok(Credentials::new(email, password))
    }
}

/// HTTP request body for phone login and registration (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PhoneCredentialsRequest {
    phone: String,
    password: String,
}

impl PhoneCredentialsRequest {
    fn try_into_credentials(self) -> Result<Credentials<PhoneNumber>, ValidationError> {
        let phone = PhoneNumber::new(self.phone)?;
        let password = Password::new(self.password)?;
        Ok(Credentials::new(phone, password))
    }
}

/// Identity and token returned by every successful flow.
///
/// The identifier the user does not have is rendered as an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthResponseData {
    pub email: String,
    pub phone: String,
    pub token: String,
}

impl From<&AuthResult> for AuthResponseData {
    fn from(result: &AuthResult) -> Self {
        Self {
            email: result
                .email
                .as_ref()
                .map(|email| email.as_str().to_string())
                .unwrap_or_default(),
            phone: result
                .phone
                .as_ref()
                .map(|phone| phone.as_str().to_string())
                .unwrap_or_default(),
            token: result.token.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::models::IdentifierKind;
    use crate::user::errors::PhoneError;

    #[test]
    fn test_auth_error_status_mapping() {
        let cases = [
            (AuthError::NotFound(IdentifierKind::Email), StatusCode::NOT_FOUND),
            (AuthError::InvalidCredentials, StatusCode::NOT_FOUND),
            (AuthError::Conflict(IdentifierKind::Phone), StatusCode::CONFLICT),
            (AuthError::Internal, StatusCode::INTERNAL_SERVER_ERROR),
            (
                ValidationError::from(PhoneError::MissingPlusPrefix).into(),
                StatusCode::BAD_REQUEST,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(ApiError::from(error).into_response().status(), status);
        }
    }

    #[test]
    fn test_auth_error_keeps_message() {
        assert_eq!(
            ApiError::from(AuthError::InvalidCredentials),
            ApiError::NotFound("invalid password".to_string())
        );
        assert_eq!(
            ApiError::from(AuthError::Conflict(IdentifierKind::Email)),
            ApiError::Conflict("email already exists".to_string())
        );
    }

    #[test]
    fn test_phone_request_validation() {
        let request = PhoneCredentialsRequest {
            phone: "6289898874".to_string(),
            password: "asdfasdf".to_string(),
        };

        assert_eq!(
            request.try_into_credentials().unwrap_err(),
            ValidationError::Phone(PhoneError::MissingPlusPrefix)
        );
    }

    #[test]
    fn test_response_renders_absent_identifier_as_empty() {
        let result = AuthResult {
            email: None,
            phone: Some(PhoneNumber::new("+6289898874".to_string()).unwrap()),
            token: "token".to_string(),
        };

        assert_eq!(
            AuthResponseData::from(&result),
            AuthResponseData {
                email: String::new(),
                phone: "+6289898874".to_string(),
                token: "token".to_string(),
            }
        );
    }
}
