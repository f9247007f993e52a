//! Attendance roster domain service.
//!
//! Enforces the registration rules: the meetup must exist, the roster must
//! have spare capacity, and a user registers at most once. The capacity
//! check itself lives behind the repository port as a single atomic
//! conditional insert, so this service only interprets its outcome.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use uuid::Uuid;

use crate::domain::ports::{
    AttendanceCommand, AttendancePayload, NewRegistration, RegisterOutcome,
    RegistrationRepository, RegistrationRepositoryError,
};
use crate::domain::{Error, UserId};

fn map_repository_error(error: RegistrationRepositoryError) -> Error {
    match error {
        RegistrationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("registration repository unavailable: {message}"))
        }
        RegistrationRepositoryError::Query { message } => {
            Error::internal(format!("registration repository error: {message}"))
        }
    }
}

/// Attendance service implementing the roster driving port.
#[derive(Clone)]
pub struct AttendanceService<R> {
    registrations: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> AttendanceService<R> {
    /// Create a new attendance service.
    pub fn new(registrations: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            registrations,
            clock,
        }
    }
}

#[async_trait]
impl<R> AttendanceCommand for AttendanceService<R>
where
    R: RegistrationRepository,
{
    async fn register(
        &self,
        user_id: &UserId,
        meetup_id: Uuid,
    ) -> Result<AttendancePayload, Error> {
        let registration = NewRegistration {
            id: Uuid::new_v4(),
            user_id: *user_id,
            meetup_id,
            registered_at: self.clock.utc(),
        };

        match self
            .registrations
            .register(registration)
            .await
            .map_err(map_repository_error)?
        {
            RegisterOutcome::Registered {
                registered_count, ..
            } => Ok(AttendancePayload {
                meetup_id,
                registered_count,
                is_registered: true,
            }),
            RegisterOutcome::CapacityExhausted => {
                Err(Error::invalid_request("meetup is at capacity")
                    .with_details(json!({ "code": "capacity_exceeded" })))
            }
            RegisterOutcome::AlreadyRegistered => {
                Err(Error::invalid_request("already registered for this meetup")
                    .with_details(json!({ "code": "already_registered" })))
            }
            RegisterOutcome::MeetupMissing => {
                Err(Error::not_found(format!("meetup {meetup_id} not found")))
            }
        }
    }

    async fn unregister(
        &self,
        user_id: &UserId,
        meetup_id: Uuid,
    ) -> Result<AttendancePayload, Error> {
        let removed = self
            .registrations
            .unregister(user_id, meetup_id)
            .await
            .map_err(map_repository_error)?;
        if !removed {
            return Err(Error::not_found("no registration for this meetup"));
        }

        let registered_count = self
            .registrations
            .count_for_meetup(meetup_id)
            .await
            .map_err(map_repository_error)?;

        Ok(AttendancePayload {
            meetup_id,
            registered_count,
            is_registered: false,
        })
    }
}

#[cfg(test)]
#[path = "attendance_service_tests.rs"]
mod tests;
