//! Embedded schema migrations.
//!
//! Migrations run over a short-lived synchronous connection before the async
//! pool is built, so the server never serves traffic against a stale schema.

use diesel::Connection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

/// All SQL migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Errors raised while applying migrations.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// Could not connect to the database.
    #[error("migration connection failed: {message}")]
    Connection {
        /// Underlying connection failure description.
        message: String,
    },
    /// A migration failed to apply.
    #[error("migration failed: {message}")]
    Apply {
        /// Underlying migration failure description.
        message: String,
    },
}

/// Apply all pending migrations against the given database.
pub fn run_pending_migrations(database_url: &str) -> Result<(), MigrationError> {
    let mut conn =
        diesel::PgConnection::establish(database_url).map_err(|err| MigrationError::Connection {
            message: err.to_string(),
        })?;

    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| MigrationError::Apply {
            message: err.to_string(),
        })?;

    for migration in applied {
        info!(migration = %migration, "applied migration");
    }
    Ok(())
}
