//! Attendance registration record.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::UserId;

/// A user's recorded intent to attend a meetup.
///
/// ## Invariants
/// - At most one registration exists per `(user_id, meetup_id)` pair; the
///   store enforces this with a uniqueness constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    id: Uuid,
    user_id: UserId,
    meetup_id: Uuid,
    registered_at: DateTime<Utc>,
}

impl Registration {
    /// Build a registration record.
    pub const fn new(
        id: Uuid,
        user_id: UserId,
        meetup_id: Uuid,
        registered_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            meetup_id,
            registered_at,
        }
    }

    /// Registration identifier.
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Registered user.
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Target meetup.
    pub const fn meetup_id(&self) -> Uuid {
        self.meetup_id
    }

    /// Instant the registration was recorded.
    pub const fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }
}
