//! PostgreSQL-backed `MeetupRepository` implementation using Diesel ORM.
//!
//! Listing queries join the host's username and derive the attendance count
//! with a grouped second query; the count is never stored.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{
    AttendanceWindow, MeetupFilter, MeetupRecord, MeetupRepository, MeetupRepositoryError,
    RegisteredMeetupRecord,
};
use crate::domain::{Capacity, Meetup, MeetupDraft, UserId, Username};

use super::diesel_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{MeetupRow, NewMeetupRow};
use super::pool::{DbPool, PoolError};
use super::schema::{meetups, registrations, users};

/// Diesel-backed implementation of the meetup repository port.
#[derive(Clone)]
pub struct DieselMeetupRepository {
    pool: DbPool,
}

impl DieselMeetupRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> MeetupRepositoryError {
    map_basic_pool_error(error, MeetupRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> MeetupRepositoryError {
    map_basic_diesel_error(
        error,
        MeetupRepositoryError::query,
        MeetupRepositoryError::connection,
    )
}

/// Escape LIKE metacharacters so user input matches literally.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Case-insensitive substring pattern for a user-supplied term.
fn contains_pattern(term: &str) -> String {
    format!("%{}%", escape_like(term))
}

/// Convert a database row into a validated domain meetup record.
fn row_to_record(
    row: MeetupRow,
    host_name: String,
    registered_count: i64,
) -> Result<MeetupRecord, MeetupRepositoryError> {
    let MeetupRow {
        id,
        title,
        description,
        date,
        location,
        category,
        capacity,
        host_id,
        created_at,
    } = row;

    let host_name =
        Username::new(host_name).map_err(|err| MeetupRepositoryError::query(err.to_string()))?;
    let capacity =
        Capacity::new(capacity).map_err(|err| MeetupRepositoryError::query(err.to_string()))?;
    let meetup = Meetup::new(MeetupDraft {
        id,
        title,
        description,
        date,
        location,
        category,
        capacity,
        host_id: UserId::from_uuid(host_id),
        created_at,
    })
    .map_err(|err| MeetupRepositoryError::query(err.to_string()))?;

    Ok(MeetupRecord {
        meetup,
        host_name,
        registered_count,
    })
}

/// Load attendance counts for the given meetup ids, grouped in one query.
async fn counts_for(
    conn: &mut AsyncPgConnection,
    ids: &[Uuid],
) -> Result<HashMap<Uuid, i64>, diesel::result::Error> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<(Uuid, i64)> = registrations::table
        .filter(registrations::meetup_id.eq_any(ids))
        .group_by(registrations::meetup_id)
        .select((registrations::meetup_id, diesel::dsl::count_star()))
        .load(conn)
        .await?;

    Ok(rows.into_iter().collect())
}

#[async_trait]
impl MeetupRepository for DieselMeetupRepository {
    async fn insert(&self, meetup: &Meetup) -> Result<(), MeetupRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewMeetupRow {
            id: meetup.id(),
            title: meetup.title(),
            description: meetup.description(),
            date: meetup.date(),
            location: meetup.location(),
            category: meetup.category(),
            capacity: meetup.capacity().get(),
            host_id: *meetup.host_id().as_uuid(),
            created_at: meetup.created_at(),
        };

        diesel::insert_into(meetups::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<MeetupRecord>, MeetupRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<(MeetupRow, String)> = meetups::table
            .inner_join(users::table)
            .filter(meetups::id.eq(id))
            .select((MeetupRow::as_select(), users::username))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        let Some((row, host_name)) = row else {
            return Ok(None);
        };

        let registered_count: i64 = registrations::table
            .filter(registrations::meetup_id.eq(id))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_record(row, host_name, registered_count).map(Some)
    }

    async fn list_upcoming(
        &self,
        filter: &MeetupFilter,
        now: DateTime<Utc>,
    ) -> Result<Vec<MeetupRecord>, MeetupRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = meetups::table
            .inner_join(users::table)
            .select((MeetupRow::as_select(), users::username))
            .filter(meetups::date.ge(now))
            .order(meetups::date.asc())
            .into_boxed();

        if let Some(term) = &filter.search {
            let pattern = contains_pattern(term);
            query = query.filter(
                meetups::title
                    .ilike(pattern.clone())
                    .or(meetups::description.ilike(pattern)),
            );
        }
        if let Some(category) = &filter.category {
            // ILIKE with escaped input gives case-insensitive equality.
            query = query.filter(meetups::category.ilike(escape_like(category)));
        }
        if let Some(location) = &filter.location {
            query = query.filter(meetups::location.ilike(contains_pattern(location)));
        }
        if let Some(day) = filter.date {
            let start = day.and_time(NaiveTime::MIN).and_utc();
            let end = start + chrono::Duration::days(1);
            query = query.filter(meetups::date.ge(start).and(meetups::date.lt(end)));
        }

        let rows: Vec<(MeetupRow, String)> =
            query.load(&mut conn).await.map_err(map_diesel_error)?;

        let ids: Vec<Uuid> = rows.iter().map(|(row, _)| row.id).collect();
        let counts = counts_for(&mut conn, &ids).await.map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|(row, host_name)| {
                let registered_count = counts.get(&row.id).copied().unwrap_or(0);
                row_to_record(row, host_name, registered_count)
            })
            .collect()
    }

    async fn list_registered_for_user(
        &self,
        user_id: &UserId,
        window: AttendanceWindow,
        now: DateTime<Utc>,
    ) -> Result<Vec<RegisteredMeetupRecord>, MeetupRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = registrations::table
            .inner_join(meetups::table.inner_join(users::table))
            .select((
                MeetupRow::as_select(),
                users::username,
                registrations::registered_at,
            ))
            .filter(registrations::user_id.eq(*user_id.as_uuid()))
            .into_boxed();

        query = match window {
            AttendanceWindow::Upcoming => query
                .filter(meetups::date.ge(now))
                .order(meetups::date.asc()),
            AttendanceWindow::Past => query
                .filter(meetups::date.lt(now))
                .order(meetups::date.desc()),
        };

        let rows: Vec<(MeetupRow, String, DateTime<Utc>)> =
            query.load(&mut conn).await.map_err(map_diesel_error)?;

        let ids: Vec<Uuid> = rows.iter().map(|(row, _, _)| row.id).collect();
        let counts = counts_for(&mut conn, &ids).await.map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|(row, host_name, registered_at)| {
                let registered_count = counts.get(&row.id).copied().unwrap_or(0);
                Ok(RegisteredMeetupRecord {
                    record: row_to_record(row, host_name, registered_count)?,
                    registered_at,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for error mapping, pattern escaping, and row
    //! conversion edge cases.

    use chrono::Utc;
    use rstest::rstest;

    use super::*;

    fn valid_row() -> MeetupRow {
        MeetupRow {
            id: Uuid::new_v4(),
            title: "Rust meetup".to_owned(),
            description: "Monthly get-together".to_owned(),
            date: Utc::now(),
            location: "Community hall".to_owned(),
            category: "tech".to_owned(),
            capacity: 20,
            host_id: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    #[rstest]
    #[case("plain", "%plain%")]
    #[case("50%", "%50\\%%")]
    #[case("under_score", "%under\\_score%")]
    #[case("back\\slash", "%back\\\\slash%")]
    fn contains_pattern_escapes_metacharacters(#[case] term: &str, #[case] expected: &str) {
        assert_eq!(contains_pattern(term), expected);
    }

    #[test]
    fn row_conversion_accepts_valid_rows() {
        let record =
            row_to_record(valid_row(), "host_user".to_owned(), 3).expect("valid row converts");
        assert_eq!(record.registered_count, 3);
        assert_eq!(record.host_name.as_ref(), "host_user");
    }

    #[test]
    fn row_conversion_rejects_non_positive_capacity() {
        let mut row = valid_row();
        row.capacity = 0;

        let error = row_to_record(row, "host_user".to_owned(), 0).expect_err("corrupt capacity");
        assert!(matches!(error, MeetupRepositoryError::Query { .. }));
    }

    #[test]
    fn row_conversion_rejects_blank_title() {
        let mut row = valid_row();
        row.title = "  ".to_owned();

        let error = row_to_record(row, "host_user".to_owned(), 0).expect_err("corrupt title");
        assert!(matches!(error, MeetupRepositoryError::Query { .. }));
    }

    #[test]
    fn pool_error_maps_to_connection_error() {
        let mapped = map_pool_error(PoolError::checkout("connection refused"));
        assert!(matches!(mapped, MeetupRepositoryError::Connection { .. }));
    }
}
