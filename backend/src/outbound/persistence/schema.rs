//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are
//! used by Diesel for compile-time query validation and type-safe SQL
//! generation. When migrations change the schema, regenerate with
//! `diesel print-schema` or update by hand.

diesel::table! {
    /// User accounts.
    ///
    /// Username and email each carry a uniqueness constraint; the password
    /// hash is opaque to the database.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique account name (max 32 characters).
        username -> Varchar,
        /// Unique login email address.
        email -> Varchar,
        /// Opaque password hash.
        password_hash -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Meetup events.
    meetups (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Short human-readable title (max 200 characters).
        title -> Varchar,
        /// Longer free-text description.
        description -> Text,
        /// Instant the meetup takes place.
        date -> Timestamptz,
        /// Free-text venue description.
        location -> Varchar,
        /// Free-text category label.
        category -> Varchar,
        /// Attendance limit; checked positive.
        capacity -> Int4,
        /// Hosting user.
        host_id -> Uuid,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Attendance registrations.
    ///
    /// `(user_id, meetup_id)` carries a uniqueness constraint; the capacity
    /// limit is enforced transactionally by the repository adapter.
    registrations (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Registering user.
        user_id -> Uuid,
        /// Target meetup.
        meetup_id -> Uuid,
        /// Registration timestamp.
        registered_at -> Timestamptz,
    }
}

diesel::table! {
    /// Meetup reviews.
    ///
    /// `(user_id, meetup_id)` carries a uniqueness constraint backing the
    /// insert-or-update upsert; `created_at` is the last-modified instant.
    reviews (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Reviewing user.
        user_id -> Uuid,
        /// Reviewed meetup.
        meetup_id -> Uuid,
        /// Star rating; checked between 1 and 5.
        rating -> Int4,
        /// Free-text review body.
        comment -> Text,
        /// Last-modified timestamp.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(meetups -> users (host_id));
diesel::joinable!(registrations -> meetups (meetup_id));
diesel::joinable!(registrations -> users (user_id));
diesel::joinable!(reviews -> meetups (meetup_id));
diesel::joinable!(reviews -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(users, meetups, registrations, reviews);
