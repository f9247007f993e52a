//! In-memory adapters and wiring helpers for tests.
//!
//! `InMemoryStore` implements every driven repository port behind one mutex,
//! reproducing the store-level guarantees the Diesel adapters get from
//! transactions: the conditional registration insert and the review upsert
//! are each evaluated under a single lock acquisition. Integration tests
//! drive the real services and HTTP handlers against it without PostgreSQL.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Local, Utc};
use mockable::Clock;
use uuid::Uuid;

use crate::domain::ports::{
    AttendanceWindow, IdentityProvider, MeetupFilter, MeetupRecord, MeetupRepository,
    MeetupRepositoryError, NewRegistration, NewUserRecord, RegisterOutcome,
    RegisteredMeetupRecord, RegistrationRepository, RegistrationRepositoryError, ReviewRepository,
    ReviewRepositoryError, ReviewWithAuthor, StoredAccount, UserRepository, UserRepositoryError,
};
use crate::domain::{
    AccountServiceImpl, AttendanceService, EmailAddress, Meetup, MeetupCommandService,
    MeetupQueryService, Registration, Review, ReviewService, User, UserId, Username,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::identity::JwtIdentityProvider;

/// Clock pinned to a fixed instant for deterministic domain tests.
#[derive(Debug, Clone, Copy)]
pub struct FrozenClock {
    now: DateTime<Utc>,
}

impl FrozenClock {
    /// Pin the clock to the given instant.
    pub const fn at(now: DateTime<Utc>) -> Self {
        Self { now }
    }
}

impl Clock for FrozenClock {
    fn local(&self) -> DateTime<Local> {
        self.now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.now
    }
}

#[derive(Debug, Clone)]
struct StoredUser {
    user: User,
    password_hash: String,
}

#[derive(Debug, Default)]
struct StoreState {
    users: Vec<StoredUser>,
    meetups: Vec<Meetup>,
    registrations: Vec<Registration>,
    reviews: Vec<Review>,
}

/// Mutex-guarded in-memory implementation of all driven repository ports.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoreState> {
        self.state.lock().expect("store lock poisoned")
    }

    /// Number of registration rows for a meetup.
    pub fn registration_count(&self, meetup_id: Uuid) -> usize {
        self.lock()
            .registrations
            .iter()
            .filter(|reg| reg.meetup_id() == meetup_id)
            .count()
    }

    /// Number of review rows for a meetup.
    pub fn review_count(&self, meetup_id: Uuid) -> usize {
        self.lock()
            .reviews
            .iter()
            .filter(|review| review.meetup_id() == meetup_id)
            .count()
    }
}

fn username_of(state: &StoreState, user_id: &UserId) -> Option<Username> {
    state
        .users
        .iter()
        .find(|stored| stored.user.id() == user_id)
        .map(|stored| stored.user.username().clone())
}

fn record_for(state: &StoreState, meetup: &Meetup) -> Result<MeetupRecord, MeetupRepositoryError> {
    let host_name = username_of(state, meetup.host_id())
        .ok_or_else(|| MeetupRepositoryError::query("host user missing"))?;
    let registered_count = state
        .registrations
        .iter()
        .filter(|reg| reg.meetup_id() == meetup.id())
        .count() as i64;

    Ok(MeetupRecord {
        meetup: meetup.clone(),
        host_name,
        registered_count,
    })
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, record: &NewUserRecord) -> Result<(), UserRepositoryError> {
        let mut state = self.lock();

        if state
            .users
            .iter()
            .any(|stored| stored.user.username() == &record.username)
        {
            return Err(UserRepositoryError::DuplicateUsername);
        }
        if state
            .users
            .iter()
            .any(|stored| stored.user.email() == &record.email)
        {
            return Err(UserRepositoryError::DuplicateEmail);
        }

        state.users.push(StoredUser {
            user: User::new(
                record.id,
                record.username.clone(),
                record.email.clone(),
                record.created_at,
            ),
            password_hash: record.password_hash.clone(),
        });
        Ok(())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredAccount>, UserRepositoryError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|stored| stored.user.email() == email)
            .map(|stored| StoredAccount {
                user: stored.user.clone(),
                password_hash: stored.password_hash.clone(),
            }))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|stored| stored.user.id() == id)
            .map(|stored| stored.user.clone()))
    }
}

#[async_trait]
impl MeetupRepository for InMemoryStore {
    async fn insert(&self, meetup: &Meetup) -> Result<(), MeetupRepositoryError> {
        self.lock().meetups.push(meetup.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<MeetupRecord>, MeetupRepositoryError> {
        let state = self.lock();
        state
            .meetups
            .iter()
            .find(|meetup| meetup.id() == id)
            .map(|meetup| record_for(&state, meetup))
            .transpose()
    }

    async fn list_upcoming(
        &self,
        filter: &MeetupFilter,
        now: DateTime<Utc>,
    ) -> Result<Vec<MeetupRecord>, MeetupRepositoryError> {
        let state = self.lock();

        let mut matching: Vec<&Meetup> = state
            .meetups
            .iter()
            .filter(|meetup| meetup.date() >= now)
            .filter(|meetup| {
                filter.search.as_deref().is_none_or(|term| {
                    contains_ci(meetup.title(), term) || contains_ci(meetup.description(), term)
                })
            })
            .filter(|meetup| {
                filter
                    .category
                    .as_deref()
                    .is_none_or(|category| meetup.category().eq_ignore_ascii_case(category))
            })
            .filter(|meetup| {
                filter
                    .location
                    .as_deref()
                    .is_none_or(|location| contains_ci(meetup.location(), location))
            })
            .filter(|meetup| {
                filter
                    .date
                    .is_none_or(|day| meetup.date().date_naive() == day)
            })
            .collect();
        matching.sort_by_key(|meetup| meetup.date());

        matching
            .into_iter()
            .map(|meetup| record_for(&state, meetup))
            .collect()
    }

    async fn list_registered_for_user(
        &self,
        user_id: &UserId,
        window: AttendanceWindow,
        now: DateTime<Utc>,
    ) -> Result<Vec<RegisteredMeetupRecord>, MeetupRepositoryError> {
        let state = self.lock();

        let mut rows: Vec<(&Meetup, DateTime<Utc>)> = state
            .registrations
            .iter()
            .filter(|reg| reg.user_id() == user_id)
            .filter_map(|reg| {
                state
                    .meetups
                    .iter()
                    .find(|meetup| meetup.id() == reg.meetup_id())
                    .map(|meetup| (meetup, reg.registered_at()))
            })
            .filter(|(meetup, _)| match window {
                AttendanceWindow::Upcoming => meetup.date() >= now,
                AttendanceWindow::Past => meetup.date() < now,
            })
            .collect();
        match window {
            AttendanceWindow::Upcoming => rows.sort_by_key(|(meetup, _)| meetup.date()),
            AttendanceWindow::Past => {
                rows.sort_by_key(|(meetup, _)| std::cmp::Reverse(meetup.date()));
            }
        }

        rows.into_iter()
            .map(|(meetup, registered_at)| {
                Ok(RegisteredMeetupRecord {
                    record: record_for(&state, meetup)?,
                    registered_at,
                })
            })
            .collect()
    }
}

#[async_trait]
impl RegistrationRepository for InMemoryStore {
    async fn register(
        &self,
        registration: NewRegistration,
    ) -> Result<RegisterOutcome, RegistrationRepositoryError> {
        // One lock acquisition covers the existence, capacity, and duplicate
        // checks plus the insert, mirroring the SQL transaction.
        let mut state = self.lock();

        let Some(capacity) = state
            .meetups
            .iter()
            .find(|meetup| meetup.id() == registration.meetup_id)
            .map(|meetup| meetup.capacity().get())
        else {
            return Ok(RegisterOutcome::MeetupMissing);
        };

        let registered_count = state
            .registrations
            .iter()
            .filter(|reg| reg.meetup_id() == registration.meetup_id)
            .count() as i64;
        if registered_count >= i64::from(capacity) {
            return Ok(RegisterOutcome::CapacityExhausted);
        }

        if state.registrations.iter().any(|reg| {
            reg.user_id() == &registration.user_id && reg.meetup_id() == registration.meetup_id
        }) {
            return Ok(RegisterOutcome::AlreadyRegistered);
        }

        let stored = Registration::new(
            registration.id,
            registration.user_id,
            registration.meetup_id,
            registration.registered_at,
        );
        state.registrations.push(stored.clone());

        Ok(RegisterOutcome::Registered {
            registration: stored,
            registered_count: registered_count + 1,
        })
    }

    async fn unregister(
        &self,
        user_id: &UserId,
        meetup_id: Uuid,
    ) -> Result<bool, RegistrationRepositoryError> {
        let mut state = self.lock();
        let before = state.registrations.len();
        state
            .registrations
            .retain(|reg| !(reg.user_id() == user_id && reg.meetup_id() == meetup_id));
        Ok(state.registrations.len() < before)
    }

    async fn exists(
        &self,
        user_id: &UserId,
        meetup_id: Uuid,
    ) -> Result<bool, RegistrationRepositoryError> {
        Ok(self
            .lock()
            .registrations
            .iter()
            .any(|reg| reg.user_id() == user_id && reg.meetup_id() == meetup_id))
    }

    async fn count_for_meetup(
        &self,
        meetup_id: Uuid,
    ) -> Result<i64, RegistrationRepositoryError> {
        Ok(self
            .lock()
            .registrations
            .iter()
            .filter(|reg| reg.meetup_id() == meetup_id)
            .count() as i64)
    }

    async fn meetup_ids_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<HashSet<Uuid>, RegistrationRepositoryError> {
        Ok(self
            .lock()
            .registrations
            .iter()
            .filter(|reg| reg.user_id() == user_id)
            .map(Registration::meetup_id)
            .collect())
    }
}

#[async_trait]
impl ReviewRepository for InMemoryStore {
    async fn upsert(&self, review: &Review) -> Result<Review, ReviewRepositoryError> {
        let mut state = self.lock();

        if let Some(existing) = state.reviews.iter_mut().find(|stored| {
            stored.user_id() == review.user_id() && stored.meetup_id() == review.meetup_id()
        }) {
            // Keep the original row id; overwrite the rest.
            *existing = Review::new(
                existing.id(),
                *review.user_id(),
                review.meetup_id(),
                review.rating(),
                review.comment().clone(),
                review.created_at(),
            );
            return Ok(existing.clone());
        }

        state.reviews.push(review.clone());
        Ok(review.clone())
    }

    async fn list_for_meetup(
        &self,
        meetup_id: Uuid,
    ) -> Result<Vec<ReviewWithAuthor>, ReviewRepositoryError> {
        let state = self.lock();

        let mut rows: Vec<&Review> = state
            .reviews
            .iter()
            .filter(|review| review.meetup_id() == meetup_id)
            .collect();
        rows.sort_by_key(|review| std::cmp::Reverse(review.created_at()));

        rows.into_iter()
            .map(|review| {
                let author = username_of(&state, review.user_id())
                    .ok_or_else(|| ReviewRepositoryError::query("review author missing"))?;
                Ok(ReviewWithAuthor {
                    review: review.clone(),
                    author,
                })
            })
            .collect()
    }
}

/// Signing secret used by test wiring.
pub const TEST_TOKEN_SECRET: &[u8] = b"test-support-signing-secret";

/// Wire real domain services over an in-memory store and a JWT identity
/// provider, producing the same state shape the server builds in
/// production.
pub fn http_state(store: Arc<InMemoryStore>, clock: Arc<dyn Clock>) -> HttpState {
    use crate::domain::ports::FixturePasswordHasher;

    let identity: Arc<dyn IdentityProvider> =
        Arc::new(JwtIdentityProvider::new(TEST_TOKEN_SECRET, clock.clone()));
    let reviews = Arc::new(ReviewService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        clock.clone(),
    ));

    HttpState {
        accounts: Arc::new(AccountServiceImpl::new(
            store.clone(),
            Arc::new(FixturePasswordHasher),
            identity.clone(),
            clock.clone(),
        )),
        meetups: Arc::new(MeetupCommandService::new(store.clone(), clock.clone())),
        meetup_query: Arc::new(MeetupQueryService::new(
            store.clone(),
            store.clone(),
            clock.clone(),
        )),
        attendance: Arc::new(AttendanceService::new(store, clock)),
        reviews: reviews.clone(),
        review_query: reviews,
        identity,
    }
}
