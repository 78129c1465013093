//! Tools to apply database migrations for SQLite.
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

pub const MIGRATIONS: EmbeddedMigrations =
    embed_migrations!("./src/migrations/diesel/sqlite/migrations");

use anyhow::Error;
use diesel::sqlite::SqliteConnection;

/// Run all pending database migrations.
///
/// # Arguments
///
/// * `conn` - Connection to SQLite database
///
pub fn run_migrations(conn: &mut SqliteConnection) -> Result<(), Error> {
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| anyhow::anyhow!("Failed to apply SQLite migrations: {}", err))?;
    log::debug!(
        "Successfully applied {} profile SQLite migration(s)",
        applied.len()
    );
    Ok(())
}

/// Get whether there are any pending migrations
///
/// # Arguments
///
/// * `conn` - Connection to SQLite database
///
pub fn any_pending_migrations(conn: &mut SqliteConnection) -> Result<bool, Error> {
    conn.has_pending_migration(MIGRATIONS)
        .map_err(|err| anyhow::anyhow!("Failed to check for pending migrations: {}", err))
}
