//! Port for user account persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{EmailAddress, User, UserId, Username};

/// Errors raised by user repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserRepositoryError {
    /// Repository connection could not be established.
    #[error("user repository connection failed: {message}")]
    Connection {
        /// Adapter-level failure description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("user repository query failed: {message}")]
    Query {
        /// Adapter-level failure description.
        message: String,
    },
    /// The requested username is already taken.
    #[error("username is already taken")]
    DuplicateUsername,
    /// The requested email address is already registered.
    #[error("email is already registered")]
    DuplicateEmail,
}

impl UserRepositoryError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// New account row handed to the adapter. The password hash is produced by
/// the [`PasswordHasher`](crate::domain::ports::PasswordHasher) port before
/// it reaches persistence.
#[derive(Debug, Clone)]
pub struct NewUserRecord {
    /// Identifier assigned by the caller.
    pub id: UserId,
    /// Unique account name.
    pub username: Username,
    /// Unique login email.
    pub email: EmailAddress,
    /// Opaque password hash.
    pub password_hash: String,
    /// Account creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A stored account joined with its password hash for credential checks.
#[derive(Debug, Clone)]
pub struct StoredAccount {
    /// The public user record.
    pub user: User,
    /// Opaque password hash for verification.
    pub password_hash: String,
}

/// Port for writing and reading user accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new account. Fails with the duplicate variants when the
    /// username or email uniqueness constraint is violated.
    async fn insert(&self, record: &NewUserRecord) -> Result<(), UserRepositoryError>;

    /// Look up an account by login email, including its password hash.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredAccount>, UserRepositoryError>;

    /// Look up a user by id.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;
}
