//! Review aggregate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::UserId;

/// Lowest accepted rating.
pub const RATING_MIN: i32 = 1;
/// Highest accepted rating.
pub const RATING_MAX: i32 = 5;

/// Validation errors returned by the review constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReviewValidationError {
    /// The rating lies outside `[RATING_MIN, RATING_MAX]`.
    #[error("rating must be between 1 and 5")]
    RatingOutOfRange,
    /// The comment is empty after trimming.
    #[error("comment must not be empty")]
    EmptyComment,
}

/// Star rating between one and five inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "i32", into = "i32")]
pub struct Rating(i32);

impl Rating {
    /// Validate and construct a [`Rating`].
    pub const fn new(rating: i32) -> Result<Self, ReviewValidationError> {
        if rating < RATING_MIN || rating > RATING_MAX {
            return Err(ReviewValidationError::RatingOutOfRange);
        }
        Ok(Self(rating))
    }

    /// The raw rating value.
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl From<Rating> for i32 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

impl TryFrom<i32> for Rating {
    type Error = ReviewValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Free-text review body, stored trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
pub struct ReviewComment(String);

impl ReviewComment {
    /// Validate and construct a [`ReviewComment`]. Surrounding whitespace is
    /// discarded.
    pub fn new(comment: impl Into<String>) -> Result<Self, ReviewValidationError> {
        let trimmed = comment.into().trim().to_owned();
        if trimmed.is_empty() {
            return Err(ReviewValidationError::EmptyComment);
        }
        Ok(Self(trimmed))
    }
}

impl AsRef<str> for ReviewComment {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for ReviewComment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<ReviewComment> for String {
    fn from(value: ReviewComment) -> Self {
        value.0
    }
}

impl TryFrom<String> for ReviewComment {
    type Error = ReviewValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A rating and comment left by an attendee for a past meetup.
///
/// ## Invariants
/// - At most one review exists per `(user_id, meetup_id)` pair; a second
///   submission overwrites the stored rating, comment, and timestamp.
/// - `created_at` is the last-modified instant, not the first-submission
///   instant, so retried submissions converge on the same final state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    id: Uuid,
    user_id: UserId,
    meetup_id: Uuid,
    rating: Rating,
    comment: ReviewComment,
    created_at: DateTime<Utc>,
}

impl Review {
    /// Build a review from validated components.
    pub const fn new(
        id: Uuid,
        user_id: UserId,
        meetup_id: Uuid,
        rating: Rating,
        comment: ReviewComment,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            meetup_id,
            rating,
            comment,
            created_at,
        }
    }

    /// Review identifier.
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Reviewing user.
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Reviewed meetup.
    pub const fn meetup_id(&self) -> Uuid {
        self.meetup_id
    }

    /// Star rating.
    pub const fn rating(&self) -> Rating {
        self.rating
    }

    /// Review body.
    pub const fn comment(&self) -> &ReviewComment {
        &self.comment
    }

    /// Last-modified timestamp.
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, true)]
    #[case(3, true)]
    #[case(5, true)]
    #[case(0, false)]
    #[case(6, false)]
    #[case(-1, false)]
    fn rating_bounds(#[case] value: i32, #[case] ok: bool) {
        assert_eq!(Rating::new(value).is_ok(), ok, "value: {value}");
    }

    #[rstest]
    #[case("Great event", Some("Great event"))]
    #[case("  padded  ", Some("padded"))]
    #[case("", None)]
    #[case("   ", None)]
    fn comment_trimming(#[case] input: &str, #[case] expected: Option<&str>) {
        match (ReviewComment::new(input), expected) {
            (Ok(comment), Some(text)) => assert_eq!(comment.as_ref(), text),
            (Err(err), None) => assert_eq!(err, ReviewValidationError::EmptyComment),
            (result, _) => panic!("unexpected outcome for {input:?}: {result:?}"),
        }
    }
}
