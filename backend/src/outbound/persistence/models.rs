//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{meetups, registrations, reviews, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub created_at: DateTime<Utc>,
}

/// Row struct for reading from the meetups table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = meetups)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MeetupRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub category: String,
    pub capacity: i32,
    pub host_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new meetup records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = meetups)]
pub(crate) struct NewMeetupRow<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub description: &'a str,
    pub date: DateTime<Utc>,
    pub location: &'a str,
    pub category: &'a str,
    pub capacity: i32,
    pub host_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new registration records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = registrations)]
pub(crate) struct NewRegistrationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub meetup_id: Uuid,
    pub registered_at: DateTime<Utc>,
}

/// Row struct for reading from the reviews table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReviewRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub meetup_id: Uuid,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new review records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = reviews)]
pub(crate) struct NewReviewRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub meetup_id: Uuid,
    pub rating: i32,
    pub comment: &'a str,
    pub created_at: DateTime<Utc>,
}

/// Changeset applied when a review upsert hits the uniqueness constraint.
/// The row id and ownership columns stay untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = reviews)]
pub(crate) struct ReviewUpdate<'a> {
    pub rating: i32,
    pub comment: &'a str,
    pub created_at: DateTime<Utc>,
}
