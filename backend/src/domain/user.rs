//! User identity types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Validation errors for user component types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// The username is empty after trimming.
    #[error("username must not be empty")]
    EmptyUsername,
    /// The username is shorter than the allowed minimum.
    #[error("username must be at least {min} characters")]
    UsernameTooShort {
        /// Minimum accepted length.
        min: usize,
    },
    /// The username is longer than the allowed maximum.
    #[error("username must be at most {max} characters")]
    UsernameTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// The username contains characters outside the allowed set.
    #[error("username may only contain letters, numbers, or underscores")]
    UsernameInvalidCharacters,
    /// The email address is empty after trimming.
    #[error("email must not be empty")]
    EmptyEmail,
    /// The email address does not have a plausible `local@domain` shape.
    #[error("email must be a valid address")]
    InvalidEmail,
}

/// Minimum allowed length for a username.
pub const USERNAME_MIN: usize = 3;
/// Maximum allowed length for a username.
pub const USERNAME_MAX: usize = 32;

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Wrap an existing UUID.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Unique account name shown alongside reviews and hosted meetups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`].
    pub fn new(username: impl Into<String>) -> Result<Self, UserValidationError> {
        let username = username.into();
        if username.trim().is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }

        let length = username.chars().count();
        if length < USERNAME_MIN {
            return Err(UserValidationError::UsernameTooShort { min: USERNAME_MIN });
        }
        if length > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }

        if !username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(UserValidationError::UsernameInvalidCharacters);
        }

        Ok(Self(username))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Email address used as the login identifier.
///
/// Validation is structural only (`local@domain` with a dotted domain); the
/// address is stored exactly as supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`].
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        let email = email.into();
        if email.trim().is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if email.trim() != email || email.chars().any(char::is_whitespace) {
            return Err(UserValidationError::InvalidEmail);
        }

        let Some((local, domain)) = email.split_once('@') else {
            return Err(UserValidationError::InvalidEmail);
        };
        if local.is_empty()
            || domain.is_empty()
            || !domain.contains('.')
            || domain.starts_with('.')
            || domain.ends_with('.')
            || domain.contains('@')
        {
            return Err(UserValidationError::InvalidEmail);
        }

        Ok(Self(email))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Application user.
///
/// ## Invariants
/// - `username` and `email` satisfy their newtype validation.
/// - The password hash is deliberately not part of this type; it only exists
///   at the persistence boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: UserId,
    #[schema(value_type = String, example = "ada_lovelace")]
    username: Username,
    #[schema(value_type = String, example = "ada@example.org")]
    email: EmailAddress,
    created_at: DateTime<Utc>,
}

impl User {
    /// Build a new [`User`] from validated components.
    pub const fn new(
        id: UserId,
        username: Username,
        email: EmailAddress,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            username,
            email,
            created_at,
        }
    }

    /// Stable user identifier.
    pub const fn id(&self) -> &UserId {
        &self.id
    }

    /// Unique account name.
    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// Login email address.
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Account creation timestamp.
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ada_lovelace", true)]
    #[case("abc", true)]
    #[case("Ada99", true)]
    #[case("ab", false)]
    #[case("", false)]
    #[case("   ", false)]
    #[case("ada lovelace", false)]
    #[case("ada!", false)]
    fn username_validation(#[case] input: &str, #[case] ok: bool) {
        assert_eq!(Username::new(input).is_ok(), ok, "input: {input:?}");
    }

    #[test]
    fn username_rejects_overlong_input() {
        let long = "a".repeat(USERNAME_MAX + 1);
        assert_eq!(
            Username::new(long),
            Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX })
        );
    }

    #[rstest]
    #[case("ada@example.org", true)]
    #[case("a.b+c@sub.example.org", true)]
    #[case("", false)]
    #[case("plainaddress", false)]
    #[case("@example.org", false)]
    #[case("ada@", false)]
    #[case("ada@nodot", false)]
    #[case("ada@.example.org", false)]
    #[case("ada @example.org", false)]
    fn email_validation(#[case] input: &str, #[case] ok: bool) {
        assert_eq!(EmailAddress::new(input).is_ok(), ok, "input: {input:?}");
    }

    #[test]
    fn user_id_serialises_as_plain_uuid_string() {
        let id = UserId::random();
        let value = serde_json::to_value(id).expect("serialise id");
        assert_eq!(value, serde_json::json!(id.as_uuid().to_string()));
    }
}
