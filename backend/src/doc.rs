//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct aggregating every HTTP endpoint and the
//! schemas they exchange. The generated specification backs Swagger UI in
//! debug builds.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::ports::{
    AccountSession, AttendancePayload, AuthoredReviewPayload, MeetupPayload,
    RegisteredMeetupPayload, ReviewPayload,
};
use crate::domain::{Error, ErrorCode, User};
use crate::inbound::http::accounts::{LoginRequestBody, RegisterAccountRequestBody};
use crate::inbound::http::meetups::CreateMeetupRequestBody;
use crate::inbound::http::reviews::SubmitReviewRequestBody;

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token issued by the auth endpoints."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Meetup backend API",
        description = "HTTP interface for browsing meetups, managing attendance, and reviewing past events."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::accounts::register_account,
        crate::inbound::http::accounts::login,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::my_meetups,
        crate::inbound::http::users::my_past_meetups,
        crate::inbound::http::meetups::list_meetups,
        crate::inbound::http::meetups::get_meetup,
        crate::inbound::http::meetups::create_meetup,
        crate::inbound::http::meetups::register_attendance,
        crate::inbound::http::meetups::unregister_attendance,
        crate::inbound::http::reviews::list_reviews,
        crate::inbound::http::reviews::submit_review,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        User,
        AccountSession,
        MeetupPayload,
        RegisteredMeetupPayload,
        AttendancePayload,
        ReviewPayload,
        AuthoredReviewPayload,
        RegisterAccountRequestBody,
        LoginRequestBody,
        CreateMeetupRequestBody,
        SubmitReviewRequestBody,
    )),
    tags(
        (name = "auth", description = "Account creation and login"),
        (name = "users", description = "The authenticated caller's profile and meetups"),
        (name = "meetups", description = "Meetup listing, creation, and attendance"),
        (name = "reviews", description = "Reviews of past meetups"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        for expected in [
            "/api/v1/auth/register",
            "/api/v1/auth/login",
            "/api/v1/users/me",
            "/api/v1/users/me/meetups",
            "/api/v1/users/me/past-meetups",
            "/api/v1/meetups",
            "/api/v1/meetups/{id}",
            "/api/v1/meetups/{id}/register",
            "/api/v1/meetups/{id}/reviews",
            "/health/ready",
            "/health/live",
        ] {
            assert!(
                paths.iter().any(|path| *path == expected),
                "missing path {expected}, have {paths:?}"
            );
        }
    }

    #[test]
    fn document_registers_error_schema() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        assert!(schemas.contains_key("Error"));
        assert!(schemas.contains_key("MeetupPayload"));
    }
}
