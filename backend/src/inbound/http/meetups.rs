//! Meetup HTTP handlers.
//!
//! ```text
//! GET    /api/v1/meetups?search=&date=&location=&category=
//! GET    /api/v1/meetups/{id}
//! POST   /api/v1/meetups
//! POST   /api/v1/meetups/{id}/register
//! DELETE /api/v1/meetups/{id}/register
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::ports::{AttendancePayload, MeetupFilter, MeetupPayload, NewMeetup};
use crate::domain::{Capacity, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::BearerIdentity;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, non_blank, parse_day, parse_rfc3339_timestamp};

/// Query parameters accepted by the meetup listing.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct MeetupListQuery {
    /// Case-insensitive substring match over title and description.
    pub search: Option<String>,
    /// Restrict to meetups on this calendar day (YYYY-MM-DD, UTC).
    pub date: Option<String>,
    /// Case-insensitive substring match over the location.
    pub location: Option<String>,
    /// Case-insensitive category match.
    pub category: Option<String>,
}

/// Request payload for creating a meetup.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMeetupRequestBody {
    /// Short human-readable title.
    pub title: String,
    /// Longer free-text description.
    pub description: String,
    /// Instant the meetup takes place (RFC 3339).
    #[schema(format = "date-time")]
    pub date: String,
    /// Free-text venue description.
    pub location: String,
    /// Free-text category label.
    pub category: String,
    /// Attendance limit; must be positive.
    pub capacity: i32,
}

fn build_filter(query: MeetupListQuery) -> Result<MeetupFilter, Error> {
    let date = non_blank(query.date)
        .map(|raw| parse_day(raw, FieldName::new("date")))
        .transpose()?;

    Ok(MeetupFilter {
        search: non_blank(query.search),
        category: non_blank(query.category),
        location: non_blank(query.location),
        date,
    })
}

/// List upcoming meetups, optionally filtered.
///
/// Authentication is optional; a valid bearer token fills the
/// caller-relative fields.
#[utoipa::path(
    get,
    path = "/api/v1/meetups",
    params(MeetupListQuery),
    responses(
        (status = 200, description = "Upcoming meetups, date ascending", body = [MeetupPayload]),
        (status = 400, description = "Invalid filter", body = Error)
    ),
    tags = ["meetups"],
    operation_id = "listMeetups",
    security([])
)]
#[get("/meetups")]
pub async fn list_meetups(
    state: web::Data<HttpState>,
    query: web::Query<MeetupListQuery>,
    identity: BearerIdentity,
) -> ApiResult<web::Json<Vec<MeetupPayload>>> {
    let caller = identity.optional_user_id(state.identity.as_ref());
    let filter = build_filter(query.into_inner())?;

    let meetups = state.meetup_query.list(filter, caller).await?;
    Ok(web::Json(meetups))
}

/// Fetch a single meetup by id, regardless of its date.
#[utoipa::path(
    get,
    path = "/api/v1/meetups/{id}",
    params(("id" = Uuid, Path, description = "Meetup identifier")),
    responses(
        (status = 200, description = "The meetup", body = MeetupPayload),
        (status = 404, description = "No such meetup", body = Error)
    ),
    tags = ["meetups"],
    operation_id = "getMeetup",
    security([])
)]
#[get("/meetups/{id}")]
pub async fn get_meetup(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
    identity: BearerIdentity,
) -> ApiResult<web::Json<MeetupPayload>> {
    let caller = identity.optional_user_id(state.identity.as_ref());
    let meetup = state
        .meetup_query
        .get(path.into_inner(), caller)
        .await?;
    Ok(web::Json(meetup))
}

/// Create a meetup hosted by the authenticated caller.
#[utoipa::path(
    post,
    path = "/api/v1/meetups",
    request_body = CreateMeetupRequestBody,
    responses(
        (status = 201, description = "Meetup created", body = MeetupPayload),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error)
    ),
    tags = ["meetups"],
    operation_id = "createMeetup",
    security(("BearerToken" = []))
)]
#[post("/meetups")]
pub async fn create_meetup(
    state: web::Data<HttpState>,
    identity: BearerIdentity,
    payload: web::Json<CreateMeetupRequestBody>,
) -> ApiResult<HttpResponse> {
    let host_id = identity.require_user_id(state.identity.as_ref())?;
    let body = payload.into_inner();

    let date = parse_rfc3339_timestamp(body.date, FieldName::new("date"))?;
    let capacity = Capacity::new(body.capacity).map_err(|err| {
        Error::invalid_request(err.to_string())
            .with_details(json!({ "field": "capacity", "code": "invalid_capacity" }))
    })?;

    let draft = NewMeetup {
        title: body.title,
        description: body.description,
        date,
        location: body.location,
        category: body.category,
        capacity,
    };

    let meetup = state.meetups.create_meetup(&host_id, draft).await?;
    Ok(HttpResponse::Created().json(meetup))
}

/// Register the authenticated caller for a meetup.
#[utoipa::path(
    post,
    path = "/api/v1/meetups/{id}/register",
    params(("id" = Uuid, Path, description = "Meetup identifier")),
    responses(
        (status = 200, description = "Registered", body = AttendancePayload),
        (status = 400, description = "Full or already registered", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 404, description = "No such meetup", body = Error)
    ),
    tags = ["meetups"],
    operation_id = "registerAttendance",
    security(("BearerToken" = []))
)]
#[post("/meetups/{id}/register")]
pub async fn register_attendance(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
    identity: BearerIdentity,
) -> ApiResult<web::Json<AttendancePayload>> {
    let user_id = identity.require_user_id(state.identity.as_ref())?;
    let payload = state
        .attendance
        .register(&user_id, path.into_inner())
        .await?;
    Ok(web::Json(payload))
}

/// Remove the authenticated caller's registration for a meetup.
#[utoipa::path(
    delete,
    path = "/api/v1/meetups/{id}/register",
    params(("id" = Uuid, Path, description = "Meetup identifier")),
    responses(
        (status = 200, description = "Unregistered", body = AttendancePayload),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 404, description = "Not registered", body = Error)
    ),
    tags = ["meetups"],
    operation_id = "unregisterAttendance",
    security(("BearerToken" = []))
)]
#[delete("/meetups/{id}/register")]
pub async fn unregister_attendance(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
    identity: BearerIdentity,
) -> ApiResult<web::Json<AttendancePayload>> {
    let user_id = identity.require_user_id(state.identity.as_ref())?;
    let payload = state
        .attendance
        .unregister(&user_id, path.into_inner())
        .await?;
    Ok(web::Json(payload))
}

#[cfg(test)]
#[path = "meetups_tests.rs"]
mod tests;
