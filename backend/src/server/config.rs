//! HTTP server configuration object and helpers.
//!
//! Configuration comes from the environment: `BIND_ADDR`, `DATABASE_URL`,
//! and the token-signing secret via `AUTH_TOKEN_SECRET_FILE` (preferred) or
//! `AUTH_TOKEN_SECRET`. Debug builds fall back to an ephemeral secret so
//! local runs need no setup; release builds refuse to start without one
//! unless `AUTH_ALLOW_EPHEMERAL_SECRET=1` is set explicitly.

use std::net::SocketAddr;

use sha2::{Digest, Sha256};
use tracing::warn;
use uuid::Uuid;
use zeroize::Zeroizing;

/// Errors raised while assembling the server configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `BIND_ADDR` did not parse as a socket address.
    #[error("invalid bind address: {message}")]
    InvalidBindAddr {
        /// Parse failure description.
        message: String,
    },
    /// The token secret file could not be read.
    #[error("failed to read token secret file {path}: {message}")]
    SecretFile {
        /// Configured file path.
        path: String,
        /// Read failure description.
        message: String,
    },
    /// No token secret is configured and ephemeral secrets are not allowed.
    #[error(
        "no token signing secret configured; set AUTH_TOKEN_SECRET_FILE or AUTH_TOKEN_SECRET"
    )]
    MissingSecret,
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) database_url: Option<String>,
    token_secret: Zeroizing<Vec<u8>>,
}

impl ServerConfig {
    /// Construct a configuration from explicit values.
    pub fn new(bind_addr: SocketAddr, token_secret: Vec<u8>) -> Self {
        Self {
            bind_addr,
            database_url: None,
            token_secret: Zeroizing::new(token_secret),
        }
    }

    /// Build the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8080".to_owned())
            .parse()
            .map_err(|err: std::net::AddrParseError| ConfigError::InvalidBindAddr {
                message: err.to_string(),
            })?;

        let token_secret = Self::resolve_secret(&lookup)?;

        Ok(Self {
            bind_addr,
            database_url: lookup("DATABASE_URL"),
            token_secret,
        })
    }

    fn resolve_secret<F>(lookup: &F) -> Result<Zeroizing<Vec<u8>>, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("AUTH_TOKEN_SECRET_FILE") {
            let bytes = std::fs::read(&path).map_err(|err| ConfigError::SecretFile {
                path,
                message: err.to_string(),
            })?;
            return Ok(Zeroizing::new(bytes));
        }
        if let Some(raw) = lookup("AUTH_TOKEN_SECRET") {
            return Ok(Zeroizing::new(raw.into_bytes()));
        }

        let allow_ephemeral = lookup("AUTH_ALLOW_EPHEMERAL_SECRET").as_deref() == Some("1");
        if cfg!(debug_assertions) || allow_ephemeral {
            warn!("using ephemeral token secret; issued tokens will not survive a restart");
            return Ok(Zeroizing::new(ephemeral_secret()));
        }

        Err(ConfigError::MissingSecret)
    }

    /// Override the bind address.
    #[must_use]
    pub fn with_bind_addr(mut self, bind_addr: SocketAddr) -> Self {
        self.bind_addr = bind_addr;
        self
    }

    /// Override the database URL.
    #[must_use]
    pub fn with_database_url(mut self, database_url: impl Into<String>) -> Self {
        self.database_url = Some(database_url.into());
        self
    }

    /// The socket address the server will bind to.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Raw token-signing secret bytes.
    pub(crate) fn token_secret(&self) -> &[u8] {
        &self.token_secret
    }

    /// Short SHA-256 fingerprint of the signing secret, safe to log for
    /// confirming which secret a deployment runs with.
    pub fn secret_fingerprint(&self) -> String {
        let digest = Sha256::digest(&self.token_secret);
        hex::encode(&digest.as_slice()[..8])
    }
}

fn ephemeral_secret() -> Vec<u8> {
    let mut bytes = Vec::with_capacity(32);
    bytes.extend_from_slice(Uuid::new_v4().as_bytes());
    bytes.extend_from_slice(Uuid::new_v4().as_bytes());
    bytes
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + '_ {
        let map: HashMap<&str, &str> = vars.iter().copied().collect();
        move |key| map.get(key).map(|value| (*value).to_owned())
    }

    #[test]
    fn defaults_apply_without_environment() {
        let config =
            ServerConfig::from_lookup(lookup_from(&[("AUTH_TOKEN_SECRET", "secret")]))
                .expect("config builds");

        assert_eq!(config.bind_addr().to_string(), "0.0.0.0:8080");
        assert!(config.database_url.is_none());
        assert_eq!(config.token_secret(), b"secret");
    }

    #[test]
    fn bind_addr_and_database_url_come_from_the_environment() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("BIND_ADDR", "127.0.0.1:9000"),
            ("DATABASE_URL", "postgres://localhost/meetups"),
            ("AUTH_TOKEN_SECRET", "secret"),
        ]))
        .expect("config builds");

        assert_eq!(config.bind_addr().to_string(), "127.0.0.1:9000");
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/meetups")
        );
    }

    #[test]
    fn invalid_bind_addr_is_rejected() {
        let result = ServerConfig::from_lookup(lookup_from(&[
            ("BIND_ADDR", "not-an-address"),
            ("AUTH_TOKEN_SECRET", "secret"),
        ]));

        assert!(matches!(result, Err(ConfigError::InvalidBindAddr { .. })));
    }

    #[test]
    fn missing_secret_file_is_rejected() {
        let result = ServerConfig::from_lookup(lookup_from(&[(
            "AUTH_TOKEN_SECRET_FILE",
            "/nonexistent/secret",
        )]));

        assert!(matches!(result, Err(ConfigError::SecretFile { .. })));
    }

    #[test]
    fn fingerprint_is_stable_and_secret_dependent() {
        let first = ServerConfig::new("127.0.0.1:8080".parse().expect("addr"), b"one".to_vec());
        let second = ServerConfig::new("127.0.0.1:8080".parse().expect("addr"), b"one".to_vec());
        let other = ServerConfig::new("127.0.0.1:8080".parse().expect("addr"), b"two".to_vec());

        assert_eq!(first.secret_fingerprint(), second.secret_fingerprint());
        assert_ne!(first.secret_fingerprint(), other.secret_fingerprint());
        assert_eq!(first.secret_fingerprint().len(), 16);
    }
}
