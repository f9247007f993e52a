//! Review HTTP handlers.
//!
//! ```text
//! GET  /api/v1/meetups/{id}/reviews
//! POST /api/v1/meetups/{id}/reviews {"rating":4,"comment":"Great"}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::ports::{AuthoredReviewPayload, ReviewPayload, SubmitReview};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::BearerIdentity;
use crate::inbound::http::state::HttpState;

/// Request payload for submitting a review.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReviewRequestBody {
    /// Star rating between one and five.
    pub rating: i32,
    /// Free-text comment; must not be blank.
    pub comment: String,
}

/// All reviews for a meetup, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/meetups/{id}/reviews",
    params(("id" = Uuid, Path, description = "Meetup identifier")),
    responses(
        (status = 200, description = "Reviews, newest first", body = [AuthoredReviewPayload]),
        (status = 404, description = "No such meetup", body = Error)
    ),
    tags = ["reviews"],
    operation_id = "listReviews",
    security([])
)]
#[get("/meetups/{id}/reviews")]
pub async fn list_reviews(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Vec<AuthoredReviewPayload>>> {
    let reviews = state.review_query.list_reviews(path.into_inner()).await?;
    Ok(web::Json(reviews))
}

/// Submit or update the caller's review of a meetup they attended.
#[utoipa::path(
    post,
    path = "/api/v1/meetups/{id}/reviews",
    params(("id" = Uuid, Path, description = "Meetup identifier")),
    request_body = SubmitReviewRequestBody,
    responses(
        (status = 201, description = "Review stored", body = ReviewPayload),
        (status = 400, description = "Invalid rating or comment", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Caller did not attend", body = Error),
        (status = 404, description = "No such meetup", body = Error)
    ),
    tags = ["reviews"],
    operation_id = "submitReview",
    security(("BearerToken" = []))
)]
#[post("/meetups/{id}/reviews")]
pub async fn submit_review(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
    identity: BearerIdentity,
    payload: web::Json<SubmitReviewRequestBody>,
) -> ApiResult<HttpResponse> {
    let user_id = identity.require_user_id(state.identity.as_ref())?;
    let body = payload.into_inner();

    let review = state
        .reviews
        .submit_review(
            &user_id,
            SubmitReview {
                meetup_id: path.into_inner(),
                rating: body.rating,
                comment: body.comment,
            },
        )
        .await?;

    Ok(HttpResponse::Created().json(review))
}

#[cfg(test)]
#[path = "reviews_tests.rs"]
mod tests;
