//! Meetup domain services.
//!
//! `MeetupCommandService` creates meetups; `MeetupQueryService` assembles the
//! listing and detail representations, including the derived attendance
//! count and the caller-relative `isRegistered`/`hasAttended` fields.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use uuid::Uuid;

use crate::domain::ports::{
    AttendanceWindow, MeetupCommand, MeetupFilter, MeetupPayload, MeetupQuery, MeetupRepository,
    MeetupRepositoryError, NewMeetup, RegisteredMeetupPayload, RegistrationRepository,
    RegistrationRepositoryError,
};
use crate::domain::{Error, Meetup, MeetupDraft, MeetupValidationError, UserId};

fn map_meetup_repository_error(error: MeetupRepositoryError) -> Error {
    match error {
        MeetupRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("meetup repository unavailable: {message}"))
        }
        MeetupRepositoryError::Query { message } => {
            Error::internal(format!("meetup repository error: {message}"))
        }
    }
}

fn map_registration_repository_error(error: RegistrationRepositoryError) -> Error {
    match error {
        RegistrationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("registration repository unavailable: {message}"))
        }
        RegistrationRepositoryError::Query { message } => {
            Error::internal(format!("registration repository error: {message}"))
        }
    }
}

fn map_validation_error(error: MeetupValidationError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({ "code": "invalid_meetup" }))
}

fn meetup_not_found(meetup_id: Uuid) -> Error {
    Error::not_found(format!("meetup {meetup_id} not found"))
}

/// Meetup service implementing the creation driving port.
#[derive(Clone)]
pub struct MeetupCommandService<M> {
    meetups: Arc<M>,
    clock: Arc<dyn Clock>,
}

impl<M> MeetupCommandService<M> {
    /// Create a new command service.
    pub fn new(meetups: Arc<M>, clock: Arc<dyn Clock>) -> Self {
        Self { meetups, clock }
    }
}

#[async_trait]
impl<M> MeetupCommand for MeetupCommandService<M>
where
    M: MeetupRepository,
{
    async fn create_meetup(
        &self,
        host_id: &UserId,
        draft: NewMeetup,
    ) -> Result<MeetupPayload, Error> {
        let now = self.clock.utc();
        let NewMeetup {
            title,
            description,
            date,
            location,
            category,
            capacity,
        } = draft;

        let meetup = Meetup::new(MeetupDraft {
            id: Uuid::new_v4(),
            title,
            description,
            date,
            location,
            category,
            capacity,
            host_id: *host_id,
            created_at: now,
        })
        .map_err(map_validation_error)?;

        self.meetups
            .insert(&meetup)
            .await
            .map_err(map_meetup_repository_error)?;

        // Re-read for the host join rather than trusting in-memory state.
        let record = self
            .meetups
            .find_by_id(meetup.id())
            .await
            .map_err(map_meetup_repository_error)?
            .ok_or_else(|| Error::internal("meetup missing immediately after insert"))?;

        Ok(MeetupPayload::from_record(record, false, now))
    }
}

/// Meetup service implementing the listing and detail driving port.
#[derive(Clone)]
pub struct MeetupQueryService<M, R> {
    meetups: Arc<M>,
    registrations: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<M, R> MeetupQueryService<M, R> {
    /// Create a new query service.
    pub fn new(meetups: Arc<M>, registrations: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            meetups,
            registrations,
            clock,
        }
    }
}

#[async_trait]
impl<M, R> MeetupQuery for MeetupQueryService<M, R>
where
    M: MeetupRepository,
    R: RegistrationRepository,
{
    async fn list(
        &self,
        filter: MeetupFilter,
        caller: Option<UserId>,
    ) -> Result<Vec<MeetupPayload>, Error> {
        let now = self.clock.utc();
        let records = self
            .meetups
            .list_upcoming(&filter, now)
            .await
            .map_err(map_meetup_repository_error)?;

        let registered: HashSet<Uuid> = match caller {
            Some(user_id) => self
                .registrations
                .meetup_ids_for_user(&user_id)
                .await
                .map_err(map_registration_repository_error)?,
            None => HashSet::new(),
        };

        Ok(records
            .into_iter()
            .map(|record| {
                let is_registered = registered.contains(&record.meetup.id());
                MeetupPayload::from_record(record, is_registered, now)
            })
            .collect())
    }

    async fn get(
        &self,
        meetup_id: Uuid,
        caller: Option<UserId>,
    ) -> Result<MeetupPayload, Error> {
        let now = self.clock.utc();
        let record = self
            .meetups
            .find_by_id(meetup_id)
            .await
            .map_err(map_meetup_repository_error)?
            .ok_or_else(|| meetup_not_found(meetup_id))?;

        let is_registered = match caller {
            Some(user_id) => self
                .registrations
                .exists(&user_id, meetup_id)
                .await
                .map_err(map_registration_repository_error)?,
            None => false,
        };

        Ok(MeetupPayload::from_record(record, is_registered, now))
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
        window: AttendanceWindow,
    ) -> Result<Vec<RegisteredMeetupPayload>, Error> {
        let now = self.clock.utc();
        let rows = self
            .meetups
            .list_registered_for_user(user_id, window, now)
            .await
            .map_err(map_meetup_repository_error)?;

        Ok(rows
            .into_iter()
            .map(|row| RegisteredMeetupPayload::from_record(row, now))
            .collect())
    }
}

#[cfg(test)]
#[path = "meetup_service_tests.rs"]
mod tests;
