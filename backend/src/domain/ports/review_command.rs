//! Driving port for submitting reviews.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Error, Review, UserId};

/// Raw review submission. Rating and comment are validated by the service so
/// failures surface with stable machine-readable detail codes.
#[derive(Debug, Clone)]
pub struct SubmitReview {
    /// Target meetup.
    pub meetup_id: Uuid,
    /// Requested star rating.
    pub rating: i32,
    /// Free-text comment.
    pub comment: String,
}

/// Serializable review representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPayload {
    /// Review identifier.
    pub id: Uuid,
    /// Reviewed meetup.
    pub meetup_id: Uuid,
    /// Reviewing user.
    pub user_id: UserId,
    /// Star rating.
    pub rating: i32,
    /// Review body.
    pub comment: String,
    /// Last-modified timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<Review> for ReviewPayload {
    fn from(review: Review) -> Self {
        Self {
            id: review.id(),
            meetup_id: review.meetup_id(),
            user_id: *review.user_id(),
            rating: review.rating().get(),
            comment: review.comment().as_ref().to_owned(),
            created_at: review.created_at(),
        }
    }
}

/// Driving port for review submission.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewCommand: Send + Sync {
    /// Submit or overwrite the caller's review of a meetup.
    ///
    /// Requires that the caller attended: a registration currently exists
    /// and the meetup date has passed. Re-submission updates the stored row
    /// in place.
    async fn submit_review(
        &self,
        user_id: &UserId,
        submission: SubmitReview,
    ) -> Result<ReviewPayload, Error>;
}
