//! Account HTTP handlers.
//!
//! ```text
//! POST /api/v1/auth/register {"username":"ada","email":"ada@example.org","password":"..."}
//! POST /api/v1/auth/login {"email":"ada@example.org","password":"..."}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::AccountSession;
use crate::domain::{
    Credentials, CredentialsValidationError, Error, NewAccount, UserValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Request payload for creating an account.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAccountRequestBody {
    /// Requested unique account name.
    pub username: String,
    /// Login email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Request payload for logging in.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequestBody {
    /// Login email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

fn map_credentials_error(err: CredentialsValidationError) -> Error {
    let (field, code) = match &err {
        CredentialsValidationError::EmptyPassword => ("password", "empty_password"),
        CredentialsValidationError::User(user_err) => match user_err {
            UserValidationError::EmptyUsername
            | UserValidationError::UsernameTooShort { .. }
            | UserValidationError::UsernameTooLong { .. }
            | UserValidationError::UsernameInvalidCharacters => ("username", "invalid_username"),
            UserValidationError::EmptyEmail | UserValidationError::InvalidEmail => {
                ("email", "invalid_email")
            }
        },
    };
    Error::invalid_request(err.to_string())
        .with_details(json!({ "field": field, "code": code }))
}

/// Create an account and return the user with a bearer token.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterAccountRequestBody,
    responses(
        (status = 201, description = "Account created", body = AccountSession),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Username or email already taken", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "registerAccount",
    security([])
)]
#[post("/auth/register")]
pub async fn register_account(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterAccountRequestBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let account = NewAccount::try_from_parts(body.username, body.email, body.password)
        .map_err(map_credentials_error)?;

    let session = state.accounts.register_account(account).await?;
    Ok(HttpResponse::Created().json(session))
}

/// Authenticate and return the user with a fresh bearer token.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequestBody,
    responses(
        (status = 200, description = "Login success", body = AccountSession),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequestBody>,
) -> ApiResult<web::Json<AccountSession>> {
    let body = payload.into_inner();
    let credentials =
        Credentials::try_from_parts(body.email, body.password).map_err(map_credentials_error)?;

    let session = state.accounts.login(credentials).await?;
    Ok(web::Json(session))
}

#[cfg(test)]
#[path = "accounts_tests.rs"]
mod tests;
