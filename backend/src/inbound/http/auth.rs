//! Bearer-token extraction for HTTP handlers.
//!
//! The extractor only captures the raw `Authorization: Bearer` value;
//! validation happens against the injected identity provider so handlers
//! stay free of framework-specific logic and tests can substitute doubles.

use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::{Ready, ready};
use tracing::debug;

use crate::domain::ports::IdentityProvider;
use crate::domain::{Error, UserId};

/// The bearer token presented with a request, if any.
#[derive(Debug, Clone)]
pub struct BearerIdentity {
    token: Option<String>,
}

impl BearerIdentity {
    /// Capture the bearer token from an `Authorization` header value.
    fn from_header(value: Option<&str>) -> Self {
        let token = value
            .and_then(|raw| raw.strip_prefix("Bearer "))
            .map(|token| token.trim().to_owned())
            .filter(|token| !token.is_empty());
        Self { token }
    }

    /// Validate the token and return the caller's user id, or `401` when the
    /// token is absent, invalid, or expired.
    pub fn require_user_id(&self, provider: &dyn IdentityProvider) -> Result<UserId, Error> {
        let Some(token) = self.token.as_deref() else {
            return Err(Error::unauthorized("access token required"));
        };
        provider
            .validate(token)
            .map_err(|_| Error::unauthorized("invalid or expired token"))
    }

    /// Return the caller's user id when a valid token is present, treating
    /// absent and invalid tokens alike as anonymous.
    pub fn optional_user_id(&self, provider: &dyn IdentityProvider) -> Option<UserId> {
        let token = self.token.as_deref()?;
        match provider.validate(token) {
            Ok(user_id) => Some(user_id),
            Err(err) => {
                debug!(error = %err, "ignoring invalid bearer token on optional route");
                None
            }
        }
    }
}

impl FromRequest for BearerIdentity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let value = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());
        ready(Ok(Self::from_header(value)))
    }
}
