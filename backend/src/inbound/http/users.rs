//! Current-user HTTP handlers.
//!
//! ```text
//! GET /api/v1/users/me
//! GET /api/v1/users/me/meetups
//! GET /api/v1/users/me/past-meetups
//! ```

use actix_web::{get, web};

use crate::domain::User;
use crate::domain::ports::{AttendanceWindow, RegisteredMeetupPayload};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::BearerIdentity;
use crate::inbound::http::state::HttpState;

/// The authenticated caller's profile.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Caller profile", body = User),
        (status = 401, description = "Unauthorized", body = crate::domain::Error),
        (status = 404, description = "Account no longer exists", body = crate::domain::Error)
    ),
    tags = ["users"],
    operation_id = "currentUser",
    security(("BearerToken" = []))
)]
#[get("/users/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    identity: BearerIdentity,
) -> ApiResult<web::Json<User>> {
    let user_id = identity.require_user_id(state.identity.as_ref())?;
    let user = state.accounts.profile(&user_id).await?;
    Ok(web::Json(user))
}

/// Upcoming meetups the caller is registered for, soonest first.
#[utoipa::path(
    get,
    path = "/api/v1/users/me/meetups",
    responses(
        (status = 200, description = "Upcoming registered meetups", body = [RegisteredMeetupPayload]),
        (status = 401, description = "Unauthorized", body = crate::domain::Error)
    ),
    tags = ["users"],
    operation_id = "myMeetups",
    security(("BearerToken" = []))
)]
#[get("/users/me/meetups")]
pub async fn my_meetups(
    state: web::Data<HttpState>,
    identity: BearerIdentity,
) -> ApiResult<web::Json<Vec<RegisteredMeetupPayload>>> {
    let user_id = identity.require_user_id(state.identity.as_ref())?;
    let meetups = state
        .meetup_query
        .list_for_user(&user_id, AttendanceWindow::Upcoming)
        .await?;
    Ok(web::Json(meetups))
}

/// Past meetups the caller was registered for, most recent first.
#[utoipa::path(
    get,
    path = "/api/v1/users/me/past-meetups",
    responses(
        (status = 200, description = "Past registered meetups", body = [RegisteredMeetupPayload]),
        (status = 401, description = "Unauthorized", body = crate::domain::Error)
    ),
    tags = ["users"],
    operation_id = "myPastMeetups",
    security(("BearerToken" = []))
)]
#[get("/users/me/past-meetups")]
pub async fn my_past_meetups(
    state: web::Data<HttpState>,
    identity: BearerIdentity,
) -> ApiResult<web::Json<Vec<RegisteredMeetupPayload>>> {
    let user_id = identity.require_user_id(state.identity.as_ref())?;
    let meetups = state
        .meetup_query
        .list_for_user(&user_id, AttendanceWindow::Past)
        .await?;
    Ok(web::Json(meetups))
}
