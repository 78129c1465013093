//! Turns a connection string into a shared pool and a [`StoreFactory`] over it.

use std::fmt::Display;
use std::str::FromStr;
#[cfg(feature = "sqlite")]
use std::sync::{Arc, RwLock};

use anyhow::Error;

#[cfg(feature = "sqlite")]
use diesel::r2d2::{ConnectionManager, Pool};

use crate::env_config::DatabaseConfig;
#[cfg(feature = "sqlite")]
use crate::store::sqlite;
use crate::store::StoreFactory;

pub enum ConnectionPool {
    #[cfg(feature = "sqlite")]
    Sqlite {
        pool: Arc<RwLock<Pool<ConnectionManager<diesel::SqliteConnection>>>>,
    },
    // Never constructed; keeps the enum non-empty without a backend.
    #[cfg(not(feature = "sqlite"))]
    #[allow(dead_code)]
    Unsupported,
}

/// The possible connection types and identifiers for a `StoreFactory`
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConnectionUri {
    /// `memory`: a private SQLite `:memory:` database
    Memory,
    #[cfg(feature = "sqlite")]
    Sqlite(String),
}

impl Display for ConnectionUri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let string = match self {
            ConnectionUri::Memory => "memory",
            #[cfg(feature = "sqlite")]
            ConnectionUri::Sqlite(sqlite) => sqlite,
        };
        write!(f, "{}", string)
    }
}

impl FromStr for ConnectionUri {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "memory" => Ok(ConnectionUri::Memory),
            #[cfg(feature = "sqlite")]
            _ if !s.trim().is_empty() => Ok(ConnectionUri::Sqlite(s.into())),
            _ => Err(anyhow!("No compatible connection type: {}", s)),
        }
    }
}

pub fn create_connection_pool(
    connection_uri: &ConnectionUri,
    config: &DatabaseConfig,
) -> Result<ConnectionPool, Error> {
    log::info!("create_connection_pool: {}", connection_uri);
    match connection_uri {
        #[cfg(feature = "sqlite")]
        ConnectionUri::Sqlite(conn_str) => {
            let pool =
                sqlite::create_sqlite_connection_pool_with_write_exclusivity(conn_str, config)?;
            Ok(ConnectionPool::Sqlite { pool })
        }
        #[cfg(feature = "sqlite")]
        ConnectionUri::Memory => {
            let pool = sqlite::create_sqlite_connection_pool_with_write_exclusivity(
                ":memory:", config,
            )?;
            Ok(ConnectionPool::Sqlite { pool })
        }
        #[cfg(not(feature = "sqlite"))]
        ConnectionUri::Memory => Err(anyhow!("Unsupported connection pool type: memory")),
    }
}

/// Creates a `StoreFactory` backed by the given connection
///
/// # Arguments
///
/// * `connection_pool` - The storage connection that will be used by all stores created by the
///   resulting factory
pub fn create_store_factory(
    connection_pool: &ConnectionPool,
) -> Result<Box<dyn StoreFactory>, Error> {
    match connection_pool {
        #[cfg(feature = "sqlite")]
        ConnectionPool::Sqlite { pool } => Ok(Box::new(
            sqlite::SqliteStoreFactory::new_with_write_exclusivity(pool.clone()),
        )),
        #[cfg(not(feature = "sqlite"))]
        ConnectionPool::Unsupported => Err(anyhow!(
            "Connection pools are unavailable in this configuration"
        )),
    }
}
