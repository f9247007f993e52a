//! PostgreSQL-backed `ReviewRepository` implementation using Diesel ORM.
//!
//! The write side is a single `INSERT ... ON CONFLICT (user_id, meetup_id)
//! DO UPDATE` statement, so concurrent submissions from the same user cannot
//! produce duplicate rows and a retry converges on the same final state.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{ReviewRepository, ReviewRepositoryError, ReviewWithAuthor};
use crate::domain::{Rating, Review, ReviewComment, UserId, Username};

use super::diesel_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewReviewRow, ReviewRow, ReviewUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::{reviews, users};

/// Diesel-backed implementation of the review repository port.
#[derive(Clone)]
pub struct DieselReviewRepository {
    pool: DbPool,
}

impl DieselReviewRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ReviewRepositoryError {
    map_basic_pool_error(error, ReviewRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ReviewRepositoryError {
    map_basic_diesel_error(
        error,
        ReviewRepositoryError::query,
        ReviewRepositoryError::connection,
    )
}

/// Convert a database row into a validated domain review.
fn row_to_review(row: ReviewRow) -> Result<Review, ReviewRepositoryError> {
    let ReviewRow {
        id,
        user_id,
        meetup_id,
        rating,
        comment,
        created_at,
    } = row;

    let rating = Rating::new(rating).map_err(|err| ReviewRepositoryError::query(err.to_string()))?;
    let comment =
        ReviewComment::new(comment).map_err(|err| ReviewRepositoryError::query(err.to_string()))?;

    Ok(Review::new(
        id,
        UserId::from_uuid(user_id),
        meetup_id,
        rating,
        comment,
        created_at,
    ))
}

#[async_trait]
impl ReviewRepository for DieselReviewRepository {
    async fn upsert(&self, review: &Review) -> Result<Review, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewReviewRow {
            id: review.id(),
            user_id: *review.user_id().as_uuid(),
            meetup_id: review.meetup_id(),
            rating: review.rating().get(),
            comment: review.comment().as_ref(),
            created_at: review.created_at(),
        };
        let update = ReviewUpdate {
            rating: review.rating().get(),
            comment: review.comment().as_ref(),
            created_at: review.created_at(),
        };

        let stored: ReviewRow = diesel::insert_into(reviews::table)
            .values(&new_row)
            .on_conflict((reviews::user_id, reviews::meetup_id))
            .do_update()
            .set(&update)
            .returning(ReviewRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_review(stored)
    }

    async fn list_for_meetup(
        &self,
        meetup_id: Uuid,
    ) -> Result<Vec<ReviewWithAuthor>, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(ReviewRow, String)> = reviews::table
            .inner_join(users::table)
            .filter(reviews::meetup_id.eq(meetup_id))
            .order((reviews::created_at.desc(), reviews::id.desc()))
            .select((ReviewRow::as_select(), users::username))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|(row, author)| {
                let author = Username::new(author)
                    .map_err(|err| ReviewRepositoryError::query(err.to_string()))?;
                Ok(ReviewWithAuthor {
                    review: row_to_review(row)?,
                    author,
                })
            })
            .collect()
    }
}
