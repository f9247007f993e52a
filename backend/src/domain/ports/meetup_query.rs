//! Driving port for meetup listing and detail reads.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::{AttendanceWindow, MeetupFilter, MeetupRecord, RegisteredMeetupRecord};
use crate::domain::{Error, UserId};

/// Serializable meetup representation including derived and caller-relative
/// fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeetupPayload {
    /// Meetup identifier.
    pub id: Uuid,
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
    pub capacity: i32,
    /// User hosting the meetup.
    pub host_id: UserId,
    /// Username of the hosting user.
    pub host_name: String,
    /// Count of registrations; derived, never stored.
    pub registered_count: i64,
    /// Whether the meetup is at capacity.
    pub is_full: bool,
    /// Whether the caller is registered. Always false for anonymous callers.
    pub is_registered: bool,
    /// Whether the caller attended: registered and the date has passed.
    /// Always false for anonymous callers.
    pub has_attended: bool,
    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl MeetupPayload {
    /// Assemble a payload from a repository record and the caller-relative
    /// attendance facts.
    pub fn from_record(record: MeetupRecord, is_registered: bool, now: DateTime<Utc>) -> Self {
        let MeetupRecord {
            meetup,
            host_name,
            registered_count,
        } = record;
        let capacity = meetup.capacity().get();
        let has_attended = is_registered && meetup.has_happened(now);

        Self {
            id: meetup.id(),
            title: meetup.title().to_owned(),
            description: meetup.description().to_owned(),
            date: meetup.date(),
            location: meetup.location().to_owned(),
            category: meetup.category().to_owned(),
            capacity,
            host_id: *meetup.host_id(),
            host_name: host_name.into(),
            registered_count,
            is_full: registered_count >= i64::from(capacity),
            is_registered,
            has_attended,
            created_at: meetup.created_at(),
        }
    }
}

/// A meetup the caller is registered for, with the registration time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredMeetupPayload {
    /// The meetup and its derived fields.
    pub meetup: MeetupPayload,
    /// When the caller registered.
    pub registered_at: DateTime<Utc>,
}

impl RegisteredMeetupPayload {
    /// Assemble a payload for a meetup the user is known to be registered
    /// for.
    pub fn from_record(record: RegisteredMeetupRecord, now: DateTime<Utc>) -> Self {
        let RegisteredMeetupRecord {
            record,
            registered_at,
        } = record;
        Self {
            meetup: MeetupPayload::from_record(record, true, now),
            registered_at,
        }
    }
}

/// Driving port for meetup reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MeetupQuery: Send + Sync {
    /// List future meetups matching the filter, date ascending.
    async fn list(
        &self,
        filter: MeetupFilter,
        caller: Option<UserId>,
    ) -> Result<Vec<MeetupPayload>, Error>;

    /// Fetch a single meetup by id regardless of its date.
    async fn get(&self, meetup_id: Uuid, caller: Option<UserId>)
    -> Result<MeetupPayload, Error>;

    /// List the caller's registered meetups on one side of now.
    async fn list_for_user(
        &self,
        user_id: &UserId,
        window: AttendanceWindow,
    ) -> Result<Vec<RegisteredMeetupPayload>, Error>;
}
