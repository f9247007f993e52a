//! Meetup aggregate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::UserId;

/// Maximum accepted title length in characters.
pub const TITLE_MAX: usize = 200;

/// Validation errors returned by [`Meetup::new`] and [`Capacity::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MeetupValidationError {
    /// The title is empty after trimming.
    #[error("title must not be empty")]
    EmptyTitle,
    /// The title exceeds [`TITLE_MAX`] characters.
    #[error("title must be at most {max} characters")]
    TitleTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// The description is empty after trimming.
    #[error("description must not be empty")]
    EmptyDescription,
    /// The location is empty after trimming.
    #[error("location must not be empty")]
    EmptyLocation,
    /// The category is empty after trimming.
    #[error("category must not be empty")]
    EmptyCategory,
    /// The capacity is zero or negative.
    #[error("capacity must be a positive integer")]
    NonPositiveCapacity,
}

/// Attendance limit for a meetup. Always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "i32", into = "i32")]
pub struct Capacity(i32);

impl Capacity {
    /// Validate and construct a [`Capacity`].
    pub const fn new(capacity: i32) -> Result<Self, MeetupValidationError> {
        if capacity < 1 {
            return Err(MeetupValidationError::NonPositiveCapacity);
        }
        Ok(Self(capacity))
    }

    /// The raw capacity value.
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl From<Capacity> for i32 {
    fn from(value: Capacity) -> Self {
        value.0
    }
}

impl TryFrom<i32> for Capacity {
    type Error = MeetupValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl std::fmt::Display for Capacity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unvalidated field bundle for constructing a [`Meetup`].
#[derive(Debug, Clone)]
pub struct MeetupDraft {
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
    pub capacity: Capacity,
    /// User hosting the meetup.
    pub host_id: UserId,
    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A scheduled event with a fixed date, capacity, and host.
///
/// ## Invariants
/// - `title`, `description`, `location`, and `category` are non-empty after
///   trimming; the title is at most [`TITLE_MAX`] characters.
/// - `capacity` is at least one.
///
/// Meetups are never updated or deleted once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Meetup {
    id: Uuid,
    title: String,
    description: String,
    date: DateTime<Utc>,
    location: String,
    category: String,
    capacity: Capacity,
    host_id: UserId,
    created_at: DateTime<Utc>,
}

impl Meetup {
    /// Validate a draft and construct a [`Meetup`].
    pub fn new(draft: MeetupDraft) -> Result<Self, MeetupValidationError> {
        let MeetupDraft {
            id,
            title,
            description,
            date,
            location,
            category,
            capacity,
            host_id,
            created_at,
        } = draft;

        if title.trim().is_empty() {
            return Err(MeetupValidationError::EmptyTitle);
        }
        if title.chars().count() > TITLE_MAX {
            return Err(MeetupValidationError::TitleTooLong { max: TITLE_MAX });
        }
        if description.trim().is_empty() {
            return Err(MeetupValidationError::EmptyDescription);
        }
        if location.trim().is_empty() {
            return Err(MeetupValidationError::EmptyLocation);
        }
        if category.trim().is_empty() {
            return Err(MeetupValidationError::EmptyCategory);
        }

        Ok(Self {
            id,
            title,
            description,
            date,
            location,
            category,
            capacity,
            host_id,
            created_at,
        })
    }

    /// Meetup identifier.
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Short human-readable title.
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Longer free-text description.
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Instant the meetup takes place.
    pub const fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// Free-text venue description.
    pub fn location(&self) -> &str {
        self.location.as_str()
    }

    /// Free-text category label.
    pub fn category(&self) -> &str {
        self.category.as_str()
    }

    /// Attendance limit.
    pub const fn capacity(&self) -> Capacity {
        self.capacity
    }

    /// User hosting the meetup.
    pub const fn host_id(&self) -> &UserId {
        &self.host_id
    }

    /// Record creation timestamp.
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether the meetup lies in the past relative to `now`.
    pub fn has_happened(&self, now: DateTime<Utc>) -> bool {
        self.date < now
    }
}
