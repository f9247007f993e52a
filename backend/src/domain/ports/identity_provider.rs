//! Port for the external identity provider.
//!
//! The identity provider issues opaque signed bearer tokens embedding a user
//! id and email, and validates presented tokens back into a user id. The
//! domain never inspects token contents; the production adapter signs JWTs.

use serde::{Deserialize, Serialize};

use crate::domain::{EmailAddress, UserId};

/// Errors raised by identity provider adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityProviderError {
    /// The token is malformed, tampered with, or expired.
    #[error("identity token is invalid or expired")]
    InvalidToken,
    /// Token issuance failed inside the adapter.
    #[error("failed to issue identity token: {message}")]
    Issue {
        /// Adapter-level failure description.
        message: String,
    },
}

impl IdentityProviderError {
    /// Create an issuance error with the given message.
    pub fn issue(message: impl Into<String>) -> Self {
        Self::Issue {
            message: message.into(),
        }
    }
}

/// Opaque signed bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityToken(String);

impl IdentityToken {
    /// Wrap an already-signed token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token string for transport.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<IdentityToken> for String {
    fn from(value: IdentityToken) -> Self {
        value.0
    }
}

/// Port issuing and validating bearer identity tokens.
#[cfg_attr(test, mockall::automock)]
pub trait IdentityProvider: Send + Sync {
    /// Sign a token embedding the user id and email.
    fn issue(
        &self,
        user_id: &UserId,
        email: &EmailAddress,
    ) -> Result<IdentityToken, IdentityProviderError>;

    /// Validate a presented token and return the embedded user id.
    fn validate(&self, token: &str) -> Result<UserId, IdentityProviderError>;
}

/// Unsigned identity provider for tests and doc examples.
///
/// Tokens are `token-<uuid>`; anything else is rejected.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureIdentityProvider;

impl IdentityProvider for FixtureIdentityProvider {
    fn issue(
        &self,
        user_id: &UserId,
        _email: &EmailAddress,
    ) -> Result<IdentityToken, IdentityProviderError> {
        Ok(IdentityToken::new(format!("token-{user_id}")))
    }

    fn validate(&self, token: &str) -> Result<UserId, IdentityProviderError> {
        token
            .strip_prefix("token-")
            .and_then(|raw| raw.parse().ok())
            .ok_or(IdentityProviderError::InvalidToken)
    }
}
