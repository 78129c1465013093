use diesel::{sqlite::SqliteConnection, Connection};

use crate::error::CliError;
use crate::migrations::run_sqlite_migrations;

use super::ProfilesEnvironment;

const DEFAULT_DATABASE_FILE: &str = "profiles.db";

/// Opens (creating if needed) the SQLite database at `connection_string` and applies every
/// pending migration.
pub fn sqlite_migrations(connection_string: String) -> Result<(), CliError> {
    if connection_string != ":memory:" {
        if let Some(parent) = std::path::Path::new(&connection_string).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|err| {
                    CliError::EnvironmentError(format!(
                        "Unable to create database directory {}: {}",
                        parent.display(),
                        err
                    ))
                })?;
            }
        }
    }

    let mut connection = SqliteConnection::establish(&connection_string).map_err(|err| {
        CliError::ActionError(format!(
            "Failed to establish database connection to '{}': {}",
            connection_string, err
        ))
    })?;

    log::info!(
        "Running migrations against SQLite database: {}",
        connection_string
    );
    run_sqlite_migrations(&mut connection).map_err(|err| {
        CliError::ActionError(format!("Unable to run SQLite migrations: {}", err))
    })?;

    Ok(())
}

/// Returns the path of the default database file inside the state directory.
pub fn get_default_database() -> Result<String, CliError> {
    let mut path = ProfilesEnvironment::load().get_state_path();
    path.push(DEFAULT_DATABASE_FILE);
    path.to_str().map(ToOwned::to_owned).ok_or_else(|| {
        CliError::EnvironmentError(format!("Invalid database path: {:?}", path))
    })
}
