//! HS256 JWT adapter for the identity provider port.
//!
//! Tokens embed the user id (`sub`) and email and stay valid for seven
//! days. Validation rejects tampered and expired tokens alike; the caller
//! only learns that the token was invalid.

use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};

use crate::domain::ports::{IdentityProvider, IdentityProviderError, IdentityToken};
use crate::domain::{EmailAddress, UserId};

/// How long an issued token stays valid.
pub const TOKEN_VALIDITY_DAYS: i64 = 7;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    email: String,
    iat: i64,
    exp: i64,
}

/// JWT-signing implementation of the identity provider port.
#[derive(Clone)]
pub struct JwtIdentityProvider {
    encoding: EncodingKey,
    decoding: DecodingKey,
    clock: Arc<dyn Clock>,
}

impl JwtIdentityProvider {
    /// Build a provider from raw secret bytes.
    pub fn new(secret: &[u8], clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            clock,
        }
    }
}

impl IdentityProvider for JwtIdentityProvider {
    fn issue(
        &self,
        user_id: &UserId,
        email: &EmailAddress,
    ) -> Result<IdentityToken, IdentityProviderError> {
        let now = self.clock.utc();
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + chrono::Duration::days(TOKEN_VALIDITY_DAYS)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map(IdentityToken::new)
            .map_err(|err| IdentityProviderError::issue(err.to_string()))
    }

    fn validate(&self, token: &str) -> Result<UserId, IdentityProviderError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map_err(|_| IdentityProviderError::InvalidToken)?;

        data.claims
            .sub
            .parse()
            .map_err(|_| IdentityProviderError::InvalidToken)
    }
}
