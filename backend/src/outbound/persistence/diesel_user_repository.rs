//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{NewUserRecord, StoredAccount, UserRepository, UserRepositoryError};
use crate::domain::{EmailAddress, User, UserId, Username};

use super::diesel_error_mapping::{
    map_basic_diesel_error, map_basic_pool_error, unique_violation_constraint,
};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    map_basic_pool_error(error, UserRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserRepositoryError {
    map_basic_diesel_error(
        error,
        UserRepositoryError::query,
        UserRepositoryError::connection,
    )
}

/// Map a failed account insert, turning uniqueness-constraint hits into the
/// typed duplicate variants.
fn map_insert_error(error: diesel::result::Error) -> UserRepositoryError {
    match unique_violation_constraint(&error) {
        Some(constraint) if constraint.contains("username") => {
            UserRepositoryError::DuplicateUsername
        }
        Some(constraint) if constraint.contains("email") => UserRepositoryError::DuplicateEmail,
        _ => map_diesel_error(error),
    }
}

/// Convert a database row into a validated domain user.
fn row_to_user(row: &UserRow) -> Result<User, UserRepositoryError> {
    let username = Username::new(row.username.clone())
        .map_err(|err| UserRepositoryError::query(err.to_string()))?;
    let email = EmailAddress::new(row.email.clone())
        .map_err(|err| UserRepositoryError::query(err.to_string()))?;

    Ok(User::new(
        UserId::from_uuid(row.id),
        username,
        email,
        row.created_at,
    ))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, record: &NewUserRecord) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewUserRow {
            id: *record.id.as_uuid(),
            username: record.username.as_ref(),
            email: record.email.as_ref(),
            password_hash: record.password_hash.as_str(),
            created_at: record.created_at,
        };

        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_insert_error)
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredAccount>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|row| {
            let user = row_to_user(&row)?;
            Ok(StoredAccount {
                user,
                password_hash: row.password_hash,
            })
        })
        .transpose()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = users::table
            .find(id.as_uuid())
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.as_ref().map(row_to_user).transpose()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for error mapping and row conversion edge cases.

    use chrono::Utc;
    use uuid::Uuid;

    use super::*;

    fn valid_row() -> UserRow {
        UserRow {
            id: Uuid::new_v4(),
            username: "ada_lovelace".to_owned(),
            email: "ada@example.org".to_owned(),
            password_hash: "$argon2id$stub".to_owned(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn row_conversion_accepts_valid_rows() {
        let row = valid_row();
        let user = row_to_user(&row).expect("valid row converts");
        assert_eq!(user.username().as_ref(), "ada_lovelace");
        assert_eq!(user.email().as_ref(), "ada@example.org");
    }

    #[test]
    fn row_conversion_rejects_corrupt_username() {
        let mut row = valid_row();
        row.username = "has spaces".to_owned();

        let error = row_to_user(&row).expect_err("corrupt username fails");
        assert!(matches!(error, UserRepositoryError::Query { .. }));
    }

    #[test]
    fn insert_error_falls_back_to_query_mapping() {
        let mapped = map_insert_error(diesel::result::Error::NotFound);
        assert!(matches!(mapped, UserRepositoryError::Query { .. }));
    }

    #[test]
    fn pool_error_maps_to_connection_error() {
        let mapped = map_pool_error(PoolError::checkout("connection refused"));
        assert!(matches!(mapped, UserRepositoryError::Connection { .. }));
        assert!(mapped.to_string().contains("connection refused"));
    }
}
