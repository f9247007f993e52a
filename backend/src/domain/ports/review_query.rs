//! Driving port for listing reviews.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::ReviewWithAuthor;
use crate::domain::{Error, UserId};

/// Serializable review joined with the author's username.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthoredReviewPayload {
    /// Review identifier.
    pub id: Uuid,
    /// Reviewed meetup.
    pub meetup_id: Uuid,
    /// Reviewing user.
    pub user_id: UserId,
    /// Username of the reviewing user.
    pub username: String,
    /// Star rating.
    pub rating: i32,
    /// Review body.
    pub comment: String,
    /// Last-modified timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<ReviewWithAuthor> for AuthoredReviewPayload {
    fn from(value: ReviewWithAuthor) -> Self {
        let ReviewWithAuthor { review, author } = value;
        Self {
            id: review.id(),
            meetup_id: review.meetup_id(),
            user_id: *review.user_id(),
            username: author.into(),
            rating: review.rating().get(),
            comment: review.comment().as_ref().to_owned(),
            created_at: review.created_at(),
        }
    }
}

/// Driving port for review reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewQuery: Send + Sync {
    /// All reviews for a meetup, newest first. No eligibility gate.
    async fn list_reviews(&self, meetup_id: Uuid) -> Result<Vec<AuthoredReviewPayload>, Error>;
}
