//! Driving port for registering and unregistering meetup attendance.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Error, UserId};

/// Roster state returned after a successful register or unregister.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendancePayload {
    /// The affected meetup.
    pub meetup_id: Uuid,
    /// Attendance count after the operation.
    pub registered_count: i64,
    /// Whether the caller is registered after the operation.
    pub is_registered: bool,
}

/// Driving port for the attendance roster.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttendanceCommand: Send + Sync {
    /// Register the user for a meetup.
    ///
    /// Fails with not-found when the meetup is missing, and with validation
    /// errors carrying the `capacity_exceeded` or `already_registered`
    /// detail codes when the roster rejects the registration.
    async fn register(&self, user_id: &UserId, meetup_id: Uuid)
    -> Result<AttendancePayload, Error>;

    /// Remove the user's registration for a meetup.
    ///
    /// Fails with not-found when no registration exists. Any review the user
    /// has already written survives.
    async fn unregister(
        &self,
        user_id: &UserId,
        meetup_id: Uuid,
    ) -> Result<AttendancePayload, Error>;
}
