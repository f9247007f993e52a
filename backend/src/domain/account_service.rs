//! Account domain service.
//!
//! Implements the account driving port on top of the user repository, the
//! password hasher, and the identity provider collaborator.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;

use crate::domain::ports::{
    AccountService, AccountSession, IdentityProvider, IdentityProviderError, NewUserRecord,
    PasswordHashError, PasswordHasher, StoredAccount, UserRepository, UserRepositoryError,
};
use crate::domain::{Credentials, Error, NewAccount, User, UserId};

fn map_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserRepositoryError::DuplicateUsername => Error::conflict("username is already taken")
            .with_details(json!({ "field": "username", "code": "duplicate_username" })),
        UserRepositoryError::DuplicateEmail => Error::conflict("email is already registered")
            .with_details(json!({ "field": "email", "code": "duplicate_email" })),
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(format!("password hashing failed: {error}"))
}

fn map_issue_error(error: IdentityProviderError) -> Error {
    Error::internal(format!("token issuance failed: {error}"))
}

/// Rejection shared by unknown emails and wrong passwords so the two cases
/// are indistinguishable to callers.
fn invalid_credentials() -> Error {
    Error::unauthorized("invalid credentials")
}

/// Account service implementing signup, login, and profile reads.
#[derive(Clone)]
pub struct AccountServiceImpl<R> {
    users: Arc<R>,
    hasher: Arc<dyn PasswordHasher>,
    identity: Arc<dyn IdentityProvider>,
    clock: Arc<dyn Clock>,
}

impl<R> AccountServiceImpl<R> {
    /// Create a new account service.
    pub fn new(
        users: Arc<R>,
        hasher: Arc<dyn PasswordHasher>,
        identity: Arc<dyn IdentityProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            hasher,
            identity,
            clock,
        }
    }
}

#[async_trait]
impl<R> AccountService for AccountServiceImpl<R>
where
    R: UserRepository,
{
    async fn register_account(&self, account: NewAccount) -> Result<AccountSession, Error> {
        let NewAccount {
            username,
            email,
            password,
        } = account;

        let password_hash = self.hasher.hash(password.expose()).map_err(map_hash_error)?;
        let user = User::new(UserId::random(), username, email, self.clock.utc());

        let record = NewUserRecord {
            id: *user.id(),
            username: user.username().clone(),
            email: user.email().clone(),
            password_hash,
            created_at: user.created_at(),
        };
        self.users
            .insert(&record)
            .await
            .map_err(map_repository_error)?;

        let token = self
            .identity
            .issue(user.id(), user.email())
            .map_err(map_issue_error)?;

        Ok(AccountSession { user, token })
    }

    async fn login(&self, credentials: Credentials) -> Result<AccountSession, Error> {
        let stored = self
            .users
            .find_by_email(&credentials.email)
            .await
            .map_err(map_repository_error)?;

        let Some(StoredAccount {
            user,
            password_hash,
        }) = stored
        else {
            return Err(invalid_credentials());
        };

        let matches = self
            .hasher
            .verify(credentials.password.expose(), &password_hash)
            .map_err(map_hash_error)?;
        if !matches {
            return Err(invalid_credentials());
        }

        let token = self
            .identity
            .issue(user.id(), user.email())
            .map_err(map_issue_error)?;

        Ok(AccountSession { user, token })
    }

    async fn profile(&self, user_id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("user {user_id} not found")))
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
