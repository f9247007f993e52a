//! Port for meetup persistence and listing reads.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::{Meetup, UserId, Username};

/// Errors raised by meetup repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MeetupRepositoryError {
    /// Repository connection could not be established.
    #[error("meetup repository connection failed: {message}")]
    Connection {
        /// Adapter-level failure description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("meetup repository query failed: {message}")]
    Query {
        /// Adapter-level failure description.
        message: String,
    },
}

impl MeetupRepositoryError {
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

/// Listing filters. All fields are optional and combined conjunctively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeetupFilter {
    /// Case-insensitive substring match over title and description.
    pub search: Option<String>,
    /// Case-insensitive category match.
    pub category: Option<String>,
    /// Case-insensitive substring match over the location.
    pub location: Option<String>,
    /// Restrict to meetups on this calendar day (UTC).
    pub date: Option<NaiveDate>,
}

/// Which side of "now" a user's registered meetups are read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceWindow {
    /// Meetups whose date is now or later, date ascending.
    Upcoming,
    /// Meetups whose date has passed, date descending.
    Past,
}

/// A meetup joined with its host's name and the derived attendance count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetupRecord {
    /// The meetup itself.
    pub meetup: Meetup,
    /// Username of the hosting user.
    pub host_name: Username,
    /// Count of registration rows; derived, never stored.
    pub registered_count: i64,
}

/// A [`MeetupRecord`] the user is registered for, with the registration time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredMeetupRecord {
    /// The meetup and its derived fields.
    pub record: MeetupRecord,
    /// When the user registered.
    pub registered_at: DateTime<Utc>,
}

/// Port for writing meetups and reading listing projections.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MeetupRepository: Send + Sync {
    /// Persist a new meetup.
    async fn insert(&self, meetup: &Meetup) -> Result<(), MeetupRepositoryError>;

    /// Find a meetup by id regardless of its date.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<MeetupRecord>, MeetupRepositoryError>;

    /// List future meetups matching the filter, date ascending.
    async fn list_upcoming(
        &self,
        filter: &MeetupFilter,
        now: DateTime<Utc>,
    ) -> Result<Vec<MeetupRecord>, MeetupRepositoryError>;

    /// List the meetups a user is registered for on one side of `now`.
    async fn list_registered_for_user(
        &self,
        user_id: &UserId,
        window: AttendanceWindow,
        now: DateTime<Utc>,
    ) -> Result<Vec<RegisteredMeetupRecord>, MeetupRepositoryError>;
}
