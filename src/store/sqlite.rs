//! Implementation of a `StoreFactory` for SQLite
use anyhow::Error;
use std::sync::{Arc, RwLock};

use diesel::{
    connection::SimpleConnection,
    r2d2::{ConnectionManager, CustomizeConnection, Pool},
    sqlite::SqliteConnection,
};

use build_database::migrations::{any_pending_sqlite_migrations, run_sqlite_migrations};

use crate::env_config::DatabaseConfig;
use crate::modules::profile::{DieselProfileStore, ProfileStore};

use super::StoreFactory;

const MEMORY: &str = ":memory:";

/// Create a SQLite connection pool.
///
/// # Arguments
///
/// * conn_str - a filename or ":memory:"
/// * config - pool sizing and lock timeout
///
/// # Errors
///
/// An error is returned if
/// * The file does not exist
/// * The pool cannot be created
/// * The database requires any pending migrations
pub fn create_sqlite_connection_pool(
    conn_str: &str,
    config: &DatabaseConfig,
) -> Result<Pool<ConnectionManager<SqliteConnection>>, Error> {
    if (conn_str != MEMORY) && !std::path::Path::new(&conn_str).exists() {
        return Err(anyhow!(
            "Database file '{}' does not exist; run `tenant_profiles database migrate` first",
            conn_str
        ));
    }
    let connection_manager = ConnectionManager::<SqliteConnection>::new(conn_str);
    let mut pool_builder = Pool::builder()
        .connection_customizer(Box::new(ConnectionCustomizer::new(config.busy_timeout_ms)))
        .error_handler(Box::new(HandlePoolError));
    // A new database is created for each connection to the in-memory SQLite
    // implementation; to ensure that the resulting stores will operate on the same
    // database, only one connection is allowed.
    if conn_str == MEMORY {
        pool_builder = pool_builder.max_size(1).min_idle(Some(1));
    } else {
        let max_size = config.max_connections.max(1);
        pool_builder = pool_builder
            .max_size(max_size)
            .min_idle(Some(config.min_idle.min(max_size)));
    }
    let pool = pool_builder
        .build(connection_manager)
        .map_err(|err| anyhow!("Failed to build connection pool: {}", err))?;
    let mut conn = pool.get().map_err(|err| anyhow!(err))?;

    if conn_str == MEMORY {
        run_sqlite_migrations(&mut conn)?;
    } else if any_pending_sqlite_migrations(&mut conn)? {
        return Err(anyhow!(
            "This version of tenant_profiles requires migrations that are not yet applied \
            to the database. Run `tenant_profiles database migrate` to apply migrations"
        ));
    }

    Ok(pool)
}

pub fn create_sqlite_connection_pool_with_write_exclusivity(
    conn_str: &str,
    config: &DatabaseConfig,
) -> Result<Arc<RwLock<Pool<ConnectionManager<SqliteConnection>>>>, Error> {
    Ok(Arc::new(RwLock::new(create_sqlite_connection_pool(
        conn_str, config,
    )?)))
}

/// A `StoreFactory` backed by a SQLite database.
pub struct SqliteStoreFactory {
    pool: Arc<RwLock<Pool<ConnectionManager<SqliteConnection>>>>,
}

impl SqliteStoreFactory {
    /// Create a new `SqliteStoreFactory`.
    pub fn new(pool: Pool<ConnectionManager<SqliteConnection>>) -> Self {
        Self {
            pool: Arc::new(RwLock::new(pool)),
        }
    }

    /// Create a new `SqliteStoreFactory` with shared write-exclusivity.
    pub fn new_with_write_exclusivity(
        pool: Arc<RwLock<Pool<ConnectionManager<SqliteConnection>>>>,
    ) -> Self {
        Self { pool }
    }
}

impl StoreFactory for SqliteStoreFactory {
    fn get_profile_store(&self) -> Box<dyn ProfileStore> {
        Box::new(DieselProfileStore::new_with_write_exclusivity(
            self.pool.clone(),
        ))
    }
}

/// Foreign keys and the busy timeout must be set on a per connection basis. This customizer
/// will be added to the SQLite pool builder and then ran against every connection returned
/// from the pool.
#[derive(Debug)]
pub struct ConnectionCustomizer {
    busy_timeout_ms: u32,
}

impl ConnectionCustomizer {
    pub fn new(busy_timeout_ms: u32) -> Self {
        Self { busy_timeout_ms }
    }
}

impl Default for ConnectionCustomizer {
    fn default() -> Self {
        Self::new(2000)
    }
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionCustomizer {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA busy_timeout = {}; PRAGMA foreign_keys = ON;",
            self.busy_timeout_ms
        ))
        .map_err(diesel::r2d2::Error::QueryError)
    }
}

#[derive(Debug)]
struct HandlePoolError;

impl diesel::r2d2::HandleError<diesel::r2d2::Error> for HandlePoolError {
    fn handle_error(&self, error: diesel::r2d2::Error) {
        // Ignore the logging of "database is locked" error when submitting the pragma to the new
        // connection. The connection will be retried by the connection manager.
        if &error.to_string() != "database is locked" {
            log::error!("{}", error);
        }
    }
}
