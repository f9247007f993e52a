//! Tests for the account service.

use std::sync::Arc;

use chrono::Utc;
use mockable::DefaultClock;

use super::*;
use crate::domain::ports::{
    FixtureIdentityProvider, FixturePasswordHasher, MockUserRepository, UserRepositoryError,
};
use crate::domain::{EmailAddress, ErrorCode, Username};

fn service(users: MockUserRepository) -> AccountServiceImpl<MockUserRepository> {
    AccountServiceImpl::new(
        Arc::new(users),
        Arc::new(FixturePasswordHasher),
        Arc::new(FixtureIdentityProvider),
        Arc::new(DefaultClock),
    )
}

fn new_account() -> NewAccount {
    NewAccount::try_from_parts("ada_lovelace", "ada@example.org", "hunter2")
        .expect("valid account fields")
}

fn stored_account(password: &str) -> StoredAccount {
    let user = User::new(
        UserId::random(),
        Username::new("ada_lovelace").expect("valid username"),
        EmailAddress::new("ada@example.org").expect("valid email"),
        Utc::now(),
    );
    StoredAccount {
        user,
        password_hash: format!("hashed:{password}"),
    }
}

#[tokio::test]
async fn register_account_stores_hash_and_issues_token() {
    let mut users = MockUserRepository::new();
    users
        .expect_insert()
        .times(1)
        .withf(|record| {
            record.username.as_ref() == "ada_lovelace"
                && record.email.as_ref() == "ada@example.org"
                && record.password_hash == "hashed:hunter2"
        })
        .return_once(|_| Ok(()));

    let session = service(users)
        .register_account(new_account())
        .await
        .expect("registration succeeds");

    assert_eq!(session.user.username().as_ref(), "ada_lovelace");
    // The fixture provider embeds the user id, so the token must validate
    // back to the new account.
    assert_eq!(
        session.token.as_str(),
        format!("token-{}", session.user.id())
    );
}

#[tokio::test]
async fn register_account_maps_duplicate_username_to_conflict() {
    let mut users = MockUserRepository::new();
    users
        .expect_insert()
        .times(1)
        .return_once(|_| Err(UserRepositoryError::DuplicateUsername));

    let err = service(users)
        .register_account(new_account())
        .await
        .expect_err("duplicate rejected");

    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(
        err.details().and_then(|d| d.get("code")),
        Some(&serde_json::json!("duplicate_username"))
    );
}

#[tokio::test]
async fn register_account_maps_duplicate_email_to_conflict() {
    let mut users = MockUserRepository::new();
    users
        .expect_insert()
        .times(1)
        .return_once(|_| Err(UserRepositoryError::DuplicateEmail));

    let err = service(users)
        .register_account(new_account())
        .await
        .expect_err("duplicate rejected");

    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn login_succeeds_with_matching_password() {
    let account = stored_account("hunter2");
    let expected_id = *account.user.id();

    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .times(1)
        .return_once(move |_| Ok(Some(account)));

    let credentials =
        Credentials::try_from_parts("ada@example.org", "hunter2").expect("valid credentials");
    let session = service(users)
        .login(credentials)
        .await
        .expect("login succeeds");

    assert_eq!(*session.user.id(), expected_id);
}

#[tokio::test]
async fn login_rejects_unknown_email() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .times(1)
        .return_once(|_| Ok(None));

    let credentials =
        Credentials::try_from_parts("ada@example.org", "hunter2").expect("valid credentials");
    let err = service(users)
        .login(credentials)
        .await
        .expect_err("unknown email rejected");

    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.message(), "invalid credentials");
}

#[tokio::test]
async fn login_rejects_wrong_password_with_identical_error() {
    let account = stored_account("hunter2");

    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .times(1)
        .return_once(move |_| Ok(Some(account)));

    let credentials =
        Credentials::try_from_parts("ada@example.org", "wrong").expect("valid credentials");
    let err = service(users)
        .login(credentials)
        .await
        .expect_err("wrong password rejected");

    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.message(), "invalid credentials");
}

#[tokio::test]
async fn profile_maps_missing_user_to_not_found() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_id().times(1).return_once(|_| Ok(None));

    let err = service(users)
        .profile(&UserId::random())
        .await
        .expect_err("missing profile");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn connection_failures_surface_as_service_unavailable() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .times(1)
        .return_once(|_| Err(UserRepositoryError::connection("pool exhausted")));

    let credentials =
        Credentials::try_from_parts("ada@example.org", "hunter2").expect("valid credentials");
    let err = service(users)
        .login(credentials)
        .await
        .expect_err("store outage surfaces");

    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}
