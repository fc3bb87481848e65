use std::fmt;

use chrono::DateTime;
use chrono::Utc;

use crate::user::errors::EmailError;
use crate::user::errors::PasswordPolicyError;
use crate::user::errors::PhoneError;

/// User aggregate entity.
///
/// Represents a registered identity. A user created by this service carries
/// exactly one of `email` or `phone`.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub email: Option<EmailAddress>,
    pub phone: Option<PhoneNumber>,
    pub password_hash: String,
    pub profile: UserProfile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Profile attachments stored alongside the credentials.
///
/// Owned by other parts of the product; authentication never reads or writes them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfile {
    pub file_id: String,
    pub file_uri: String,
    pub file_thumbnail_uri: String,
    pub bank_account_name: String,
    pub bank_account_holder: String,
    pub bank_account_number: String,
}

/// Store-assigned numeric user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates a bare `local@domain.tld` address with an RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `Empty` - Email is blank
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        if email.trim().is_empty() {
            return Err(EmailError::Empty);
        }

        // Bare addr-spec with a TLD, one spelling per mailbox
        let options = email_address::Options::default()
            .without_display_text()
            .without_domain_literal()
            .with_required_tld();

        email_address::EmailAddress::parse_with_options(&email, options)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// International phone number.
///
/// A `+` followed by 1 to 15 digits (E.164 length bound), e.g. `+6289898874`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    const MAX_DIGITS: usize = 15;

    /// Create a new validated phone number.
    ///
    /// # Errors
    /// * `Empty` - Phone is blank
    /// * `MissingPlusPrefix` - Does not start with `+`
    /// * `InvalidDigits` - Anything after `+` other than 1 to 15 ASCII digits
    pub fn new(phone: String) -> Result<Self, PhoneError> {
        if phone.is_empty() {
            return Err(PhoneError::Empty);
        }

        let digits = phone
            .strip_prefix('+')
            .ok_or(PhoneError::MissingPlusPrefix)?;

        if digits.is_empty()
            || digits.len() > Self::MAX_DIGITS
            || !digits.chars().all(|c| c.is_ascii_digit())
        {
            return Err(PhoneError::InvalidDigits {
                max: Self::MAX_DIGITS,
            });
        }

        Ok(Self(phone))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password as submitted by a client.
///
/// Ensures the password is 8-32 characters. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    const MIN_LENGTH: usize = 8;
    const MAX_LENGTH: usize = 32;

    /// Create a new password that satisfies the length policy.
    ///
    /// # Errors
    /// * `Empty` - Password is empty
    /// * `TooShort` - Shorter than 8 characters
    /// * `TooLong` - Longer than 32 characters
    pub fn new(password: String) -> Result<Self, PasswordPolicyError> {
        let length = password.chars().count();
        if length == 0 {
            Err(PasswordPolicyError::Empty)
        } else if length < Self::MIN_LENGTH {
            Err(PasswordPolicyError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(PasswordPolicyError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(password))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(**redacted**)")
    }
}

/// Which kind of login key an identifier is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierKind {
    Email,
    Phone,
}

impl IdentifierKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentifierKind::Email => "email",
            IdentifierKind::Phone => "phone",
        }
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unique login key of a user: either an email address or a phone number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identifier {
    Email(EmailAddress),
    Phone(PhoneNumber),
}

impl Identifier {
    pub fn kind(&self) -> IdentifierKind {
        match self {
            Identifier::Email(_) => IdentifierKind::Email,
            Identifier::Phone(_) => IdentifierKind::Phone,
        }
    }

    /// Identifier string as signed into tokens.
    pub fn as_str(&self) -> &str {
        match self {
            Identifier::Email(email) => email.as_str(),
            Identifier::Phone(phone) => phone.as_str(),
        }
    }
}

impl From<EmailAddress> for Identifier {
    fn from(email: EmailAddress) -> Self {
        Identifier::Email(email)
    }
}

impl From<PhoneNumber> for Identifier {
    fn from(phone: PhoneNumber) -> Self {
        Identifier::Phone(phone)
    }
}

/// Insert payload for a new user.
///
/// Id, timestamps and profile fields are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub identifier: Identifier,
    pub password_hash: String,
}

impl NewUser {
    pub fn email(&self) -> Option<&EmailAddress> {
        match &self.identifier {
            Identifier::Email(email) => Some(email),
            Identifier::Phone(_) => None,
        }
    }

    pub fn phone(&self) -> Option<&PhoneNumber> {
        match &self.identifier {
            Identifier::Phone(phone) => Some(phone),
            Identifier::Email(_) => None,
        }
    }
}

/// Validated login or registration request.
#[derive(Debug, Clone)]
pub struct Credentials<I> {
    pub identifier: I,
    pub password: Password,
}

impl<I> Credentials<I> {
    pub fn new(identifier: I, password: Password) -> Self {
        Self {
            identifier,
            password,
        }
    }
}

/// Outcome of a successful login or registration.
///
/// Carries only the identity fields that are safe to expose plus the issued
/// token; the identifier kind the user does not have is `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResult {
    pub email: Option<EmailAddress>,
    pub phone: Option<PhoneNumber>,
    pub token: String,
}

impl AuthResult {
    pub fn new(user: &User, token: String) -> Self {
        Self {
            email: user.email.clone(),
            phone: user.phone.clone(),
            token,
        }
    }
}
