//! Port for review persistence.
//!
//! The write side is an upsert keyed on `(user_id, meetup_id)`: adapters
//! must implement it as a single conditional insert-or-update so concurrent
//! submissions from the same user cannot produce duplicate rows.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Review, Username};

/// Errors raised by review repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReviewRepositoryError {
    /// Repository connection could not be established.
    #[error("review repository connection failed: {message}")]
    Connection {
        /// Adapter-level failure description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("review repository query failed: {message}")]
    Query {
        /// Adapter-level failure description.
        message: String,
    },
}

impl ReviewRepositoryError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// A review joined with the author's username for listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewWithAuthor {
    /// The stored review.
    pub review: Review,
    /// Username of the reviewing user.
    pub author: Username,
}

/// Port for writing and listing reviews.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Insert the review, or overwrite rating, comment, and timestamp when a
    /// row for the `(user, meetup)` pair already exists. Returns the stored
    /// row, which keeps its original id on update.
    async fn upsert(&self, review: &Review) -> Result<Review, ReviewRepositoryError>;

    /// All reviews for a meetup with their authors, newest first.
    async fn list_for_meetup(
        &self,
        meetup_id: Uuid,
    ) -> Result<Vec<ReviewWithAuthor>, ReviewRepositoryError>;
}
