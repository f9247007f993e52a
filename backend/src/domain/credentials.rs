//! Account credential value types.
//!
//! Raw passwords are wrapped in [`Password`] so the plaintext is zeroised on
//! drop and never appears in debug output or serialised payloads.

use zeroize::Zeroizing;

use crate::domain::{EmailAddress, UserValidationError, Username};

/// Validation errors for credential inputs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsValidationError {
    /// The password is empty.
    #[error("password must not be empty")]
    EmptyPassword,
    /// A username or email component failed validation.
    #[error(transparent)]
    User(#[from] UserValidationError),
}

/// Plaintext password handled only at the authentication boundary.
#[derive(Clone)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Validate and construct a [`Password`].
    pub fn new(password: impl Into<String>) -> Result<Self, CredentialsValidationError> {
        let password = Zeroizing::new(password.into());
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self(password))
    }

    /// Expose the plaintext for hashing or verification.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Validated signup request for a new account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Requested unique account name.
    pub username: Username,
    /// Login email address.
    pub email: EmailAddress,
    /// Plaintext password to be hashed before storage.
    pub password: Password,
}

impl NewAccount {
    /// Validate raw signup fields.
    pub fn try_from_parts(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, CredentialsValidationError> {
        Ok(Self {
            username: Username::new(username)?,
            email: EmailAddress::new(email)?,
            password: Password::new(password)?,
        })
    }
}

/// Validated login request.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Login email address.
    pub email: EmailAddress,
    /// Plaintext password to verify.
    pub password: Password,
}

impl Credentials {
    /// Validate raw login fields.
    pub fn try_from_parts(
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, CredentialsValidationError> {
        Ok(Self {
            email: EmailAddress::new(email)?,
            password: Password::new(password)?,
        })
    }
}
