//! Driving port for creating meetups.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::MeetupPayload;
use crate::domain::{Capacity, Error, UserId};

/// Validated field bundle for a meetup creation request. The id and
/// creation timestamp are assigned by the service.
#[derive(Debug, Clone)]
pub struct NewMeetup {
    /// Short human-readable title.
    pub title: String,
    /// Longer free-text description.
    pub description: String,
    /// Instant the meetup takes place.
    pub date: DateTime<Utc>,
    /// Free-text venue description.
    pub location: String,
    /// Free-text category label.
    pub category: String,
    /// Attendance limit.
    pub capacity: Capacity,
}

/// Driving port for meetup creation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MeetupCommand: Send + Sync {
    /// Create a meetup hosted by the given user and return its
    /// representation.
    async fn create_meetup(
        &self,
        host_id: &UserId,
        draft: NewMeetup,
    ) -> Result<MeetupPayload, Error>;
}
