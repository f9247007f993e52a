//! Port for attendance registration persistence.
//!
//! The register operation is specified as a single atomic conditional
//! insert: adapters must evaluate the capacity check and the insert against
//! one consistent snapshot (row lock plus recount in SQL, a single mutex in
//! memory) so concurrent registrations can never overbook a meetup.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Registration, UserId};

/// Errors raised by registration repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationRepositoryError {
    /// Repository connection could not be established.
    #[error("registration repository connection failed: {message}")]
    Connection {
        /// Adapter-level failure description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("registration repository query failed: {message}")]
    Query {
        /// Adapter-level failure description.
        message: String,
    },
}

impl RegistrationRepositoryError {
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

/// New registration row handed to the adapter.
#[derive(Debug, Clone)]
pub struct NewRegistration {
    /// Identifier assigned by the caller.
    pub id: Uuid,
    /// Registering user.
    pub user_id: UserId,
    /// Target meetup.
    pub meetup_id: Uuid,
    /// Registration timestamp.
    pub registered_at: DateTime<Utc>,
}

/// Result of the atomic conditional registration insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// The registration was inserted.
    Registered {
        /// The stored registration row.
        registration: Registration,
        /// Attendance count including this registration.
        registered_count: i64,
    },
    /// The meetup is already at capacity.
    CapacityExhausted,
    /// A registration for this `(user, meetup)` pair already exists.
    AlreadyRegistered,
    /// No meetup with the given id exists.
    MeetupMissing,
}

/// Port for the attendance roster of meetups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    /// Atomically insert a registration if the meetup exists, has spare
    /// capacity, and the user is not already registered.
    async fn register(
        &self,
        registration: NewRegistration,
    ) -> Result<RegisterOutcome, RegistrationRepositoryError>;

    /// Delete the registration for the pair. Returns whether a row existed.
    async fn unregister(
        &self,
        user_id: &UserId,
        meetup_id: Uuid,
    ) -> Result<bool, RegistrationRepositoryError>;

    /// Whether a registration currently exists for the pair.
    async fn exists(
        &self,
        user_id: &UserId,
        meetup_id: Uuid,
    ) -> Result<bool, RegistrationRepositoryError>;

    /// Derived attendance count for a meetup.
    async fn count_for_meetup(&self, meetup_id: Uuid)
    -> Result<i64, RegistrationRepositoryError>;

    /// Ids of all meetups the user is currently registered for.
    async fn meetup_ids_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<HashSet<Uuid>, RegistrationRepositoryError>;
}
