//! PostgreSQL-backed `RegistrationRepository` implementation using Diesel.
//!
//! The register operation runs in a single transaction that locks the meetup
//! row with `FOR UPDATE`, recounts the roster, and inserts. Two concurrent
//! registrations at the capacity boundary serialize on the row lock, so the
//! count can never exceed the capacity. The `(user_id, meetup_id)`
//! uniqueness constraint backs the duplicate check via
//! `ON CONFLICT DO NOTHING`.

use std::collections::HashSet;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{
    NewRegistration, RegisterOutcome, RegistrationRepository, RegistrationRepositoryError,
};
use crate::domain::{Registration, UserId};

use super::diesel_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::NewRegistrationRow;
use super::pool::{DbPool, PoolError};
use super::schema::{meetups, registrations};

/// Diesel-backed implementation of the registration repository port.
#[derive(Clone)]
pub struct DieselRegistrationRepository {
    pool: DbPool,
}

impl DieselRegistrationRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RegistrationRepositoryError {
    map_basic_pool_error(error, RegistrationRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> RegistrationRepositoryError {
    map_basic_diesel_error(
        error,
        RegistrationRepositoryError::query,
        RegistrationRepositoryError::connection,
    )
}

#[async_trait]
impl RegistrationRepository for DieselRegistrationRepository {
    async fn register(
        &self,
        registration: NewRegistration,
    ) -> Result<RegisterOutcome, RegistrationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let outcome = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    // Lock the meetup row so concurrent registrations for the
                    // same meetup serialize here.
                    let capacity: Option<i32> = meetups::table
                        .find(registration.meetup_id)
                        .select(meetups::capacity)
                        .for_update()
                        .first(conn)
                        .await
                        .optional()?;

                    let Some(capacity) = capacity else {
                        return Ok(RegisterOutcome::MeetupMissing);
                    };

                    let registered_count: i64 = registrations::table
                        .filter(registrations::meetup_id.eq(registration.meetup_id))
                        .count()
                        .get_result(conn)
                        .await?;

                    if registered_count >= i64::from(capacity) {
                        return Ok(RegisterOutcome::CapacityExhausted);
                    }

                    let row = NewRegistrationRow {
                        id: registration.id,
                        user_id: *registration.user_id.as_uuid(),
                        meetup_id: registration.meetup_id,
                        registered_at: registration.registered_at,
                    };
                    let inserted = diesel::insert_into(registrations::table)
                        .values(&row)
                        .on_conflict_do_nothing()
                        .execute(conn)
                        .await?;

                    if inserted == 0 {
                        return Ok(RegisterOutcome::AlreadyRegistered);
                    }

                    Ok(RegisterOutcome::Registered {
                        registration: Registration::new(
                            registration.id,
                            registration.user_id,
                            registration.meetup_id,
                            registration.registered_at,
                        ),
                        registered_count: registered_count + 1,
                    })
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        Ok(outcome)
    }

    async fn unregister(
        &self,
        user_id: &UserId,
        meetup_id: Uuid,
    ) -> Result<bool, RegistrationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(
            registrations::table
                .filter(registrations::user_id.eq(user_id.as_uuid()))
                .filter(registrations::meetup_id.eq(meetup_id)),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }

    async fn exists(
        &self,
        user_id: &UserId,
        meetup_id: Uuid,
    ) -> Result<bool, RegistrationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::select(diesel::dsl::exists(
            registrations::table
                .filter(registrations::user_id.eq(user_id.as_uuid()))
                .filter(registrations::meetup_id.eq(meetup_id)),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn count_for_meetup(
        &self,
        meetup_id: Uuid,
    ) -> Result<i64, RegistrationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        registrations::table
            .filter(registrations::meetup_id.eq(meetup_id))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn meetup_ids_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<HashSet<Uuid>, RegistrationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let ids: Vec<Uuid> = registrations::table
            .filter(registrations::user_id.eq(user_id.as_uuid()))
            .select(registrations::meetup_id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(ids.into_iter().collect())
    }
}
