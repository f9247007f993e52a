//! Driving port for account signup, login, and profile reads.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::IdentityToken;
use crate::domain::{Credentials, Error, NewAccount, User, UserId};

/// An authenticated user together with a freshly issued bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountSession {
    /// The public user record.
    pub user: User,
    /// Bearer token for subsequent requests.
    #[schema(value_type = String)]
    pub token: IdentityToken,
}

/// Driving port for account management.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Create an account and issue a token for it.
    ///
    /// Fails with a conflict error when the username or email is taken.
    async fn register_account(&self, account: NewAccount) -> Result<AccountSession, Error>;

    /// Authenticate credentials and issue a token.
    ///
    /// Unknown emails and wrong passwords are indistinguishable to callers.
    async fn login(&self, credentials: Credentials) -> Result<AccountSession, Error>;

    /// Read the caller's own profile.
    async fn profile(&self, user_id: &UserId) -> Result<User, Error>;
}
