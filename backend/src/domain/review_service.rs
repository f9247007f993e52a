//! Eligibility and review domain service.
//!
//! Gates review submission on attendance (a registration currently exists
//! for the pair and the meetup date has passed) and persists reviews
//! through the repository's atomic upsert. Unregistering therefore revokes
//! eligibility; an already-written review survives regardless.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use uuid::Uuid;

use crate::domain::ports::{
    AuthoredReviewPayload, MeetupRepository, MeetupRepositoryError, RegistrationRepository,
    RegistrationRepositoryError, ReviewCommand, ReviewPayload, ReviewQuery, ReviewRepository,
    ReviewRepositoryError, SubmitReview,
};
use crate::domain::{Error, Rating, Review, ReviewComment, UserId};

fn map_meetup_repository_error(error: MeetupRepositoryError) -> Error {
    match error {
        MeetupRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("meetup repository unavailable: {message}"))
        }
        MeetupRepositoryError::Query { message } => {
            Error::internal(format!("meetup repository error: {message}"))
        }
    }
}

fn map_registration_repository_error(error: RegistrationRepositoryError) -> Error {
    match error {
        RegistrationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("registration repository unavailable: {message}"))
        }
        RegistrationRepositoryError::Query { message } => {
            Error::internal(format!("registration repository error: {message}"))
        }
    }
}

fn map_review_repository_error(error: ReviewRepositoryError) -> Error {
    match error {
        ReviewRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("review repository unavailable: {message}"))
        }
        ReviewRepositoryError::Query { message } => {
            Error::internal(format!("review repository error: {message}"))
        }
    }
}

fn meetup_not_found(meetup_id: Uuid) -> Error {
    Error::not_found(format!("meetup {meetup_id} not found"))
}

fn not_eligible(message: &str) -> Error {
    Error::forbidden(message).with_details(json!({ "code": "not_eligible" }))
}

/// Review service implementing the submission and listing driving ports.
#[derive(Clone)]
pub struct ReviewService<M, G, V> {
    meetups: Arc<M>,
    registrations: Arc<G>,
    reviews: Arc<V>,
    clock: Arc<dyn Clock>,
}

impl<M, G, V> ReviewService<M, G, V> {
    /// Create a new review service.
    pub fn new(
        meetups: Arc<M>,
        registrations: Arc<G>,
        reviews: Arc<V>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            meetups,
            registrations,
            reviews,
            clock,
        }
    }
}

#[async_trait]
impl<M, G, V> ReviewCommand for ReviewService<M, G, V>
where
    M: MeetupRepository,
    G: RegistrationRepository,
    V: ReviewRepository,
{
    async fn submit_review(
        &self,
        user_id: &UserId,
        submission: SubmitReview,
    ) -> Result<ReviewPayload, Error> {
        let rating = Rating::new(submission.rating).map_err(|err| {
            Error::invalid_request(err.to_string())
                .with_details(json!({ "field": "rating", "code": "invalid_rating" }))
        })?;
        let comment = ReviewComment::new(submission.comment).map_err(|err| {
            Error::invalid_request(err.to_string())
                .with_details(json!({ "field": "comment", "code": "invalid_comment" }))
        })?;

        let record = self
            .meetups
            .find_by_id(submission.meetup_id)
            .await
            .map_err(map_meetup_repository_error)?
            .ok_or_else(|| meetup_not_found(submission.meetup_id))?;

        let now = self.clock.utc();
        if !record.meetup.has_happened(now) {
            return Err(not_eligible("can only review past meetups"));
        }
        let registered = self
            .registrations
            .exists(user_id, submission.meetup_id)
            .await
            .map_err(map_registration_repository_error)?;
        if !registered {
            return Err(not_eligible("can only review meetups you attended"));
        }

        let review = Review::new(
            Uuid::new_v4(),
            *user_id,
            submission.meetup_id,
            rating,
            comment,
            now,
        );
        let stored = self
            .reviews
            .upsert(&review)
            .await
            .map_err(map_review_repository_error)?;

        Ok(stored.into())
    }
}

#[async_trait]
impl<M, G, V> ReviewQuery for ReviewService<M, G, V>
where
    M: MeetupRepository,
    G: RegistrationRepository,
    V: ReviewRepository,
{
    async fn list_reviews(&self, meetup_id: Uuid) -> Result<Vec<AuthoredReviewPayload>, Error> {
        self.meetups
            .find_by_id(meetup_id)
            .await
            .map_err(map_meetup_repository_error)?
            .ok_or_else(|| meetup_not_found(meetup_id))?;

        let rows = self
            .reviews
            .list_for_meetup(meetup_id)
            .await
            .map_err(map_review_repository_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
#[path = "review_service_tests.rs"]
mod tests;
