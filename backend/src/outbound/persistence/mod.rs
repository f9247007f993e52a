//! PostgreSQL persistence adapters implementing the driven ports.

mod diesel_error_mapping;
mod diesel_meetup_repository;
mod diesel_registration_repository;
mod diesel_review_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
pub(crate) mod schema;

pub use diesel_meetup_repository::DieselMeetupRepository;
pub use diesel_registration_repository::DieselRegistrationRepository;
pub use diesel_review_repository::DieselReviewRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
