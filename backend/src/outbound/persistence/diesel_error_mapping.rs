//! Shared Diesel error mapping for the repository adapters.

use tracing::debug;

use super::pool::PoolError;

/// Map pool errors into a repository-specific connection error constructor.
pub(crate) fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map common Diesel error variants into query/connection constructors.
///
/// `NotFound` and query-builder failures map to query errors; only a closed
/// connection maps to the connection constructor. The raw database message
/// is logged, never surfaced.
pub(crate) fn map_basic_diesel_error<E, Q, C>(
    error: diesel::result::Error,
    query: Q,
    connection: C,
) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        DieselError::DatabaseError(_, _) => query("database error"),
        _ => query("database error"),
    }
}

/// The constraint name behind a unique-violation error, if that is what
/// `error` is. Adapters use this to turn constraint hits into typed
/// duplicate outcomes instead of opaque query errors.
pub(crate) fn unique_violation_constraint(error: &diesel::result::Error) -> Option<&str> {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            info.constraint_name()
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::Error as DieselError;

    #[derive(Debug, PartialEq)]
    enum Mapped {
        Query(&'static str),
        Connection(&'static str),
    }

    #[test]
    fn not_found_maps_to_query_error() {
        let mapped = map_basic_diesel_error(DieselError::NotFound, Mapped::Query, Mapped::Connection);
        assert_eq!(mapped, Mapped::Query("record not found"));
    }

    #[test]
    fn pool_errors_map_to_connection_constructor() {
        let mapped: Mapped = map_basic_pool_error(PoolError::checkout("refused"), |message| {
            assert_eq!(message, "refused");
            Mapped::Connection("connection")
        });
        assert_eq!(mapped, Mapped::Connection("connection"));
    }

    #[test]
    fn non_database_errors_are_not_unique_violations() {
        assert_eq!(unique_violation_constraint(&DieselError::NotFound), None);
    }
}
