//! Provides sql migration scripts and methods for executing
//! migrations.
//!
//! ```ignore
//! use build_database::migrations::run_sqlite_migrations;
//! use diesel::{sqlite::SqliteConnection, Connection};
//!
//! let mut connection = SqliteConnection::establish("profiles.db").unwrap();
//!
//! run_sqlite_migrations(&mut connection).unwrap();
//!
//! ```

#[cfg(feature = "diesel")]
mod diesel;

#[cfg(feature = "sqlite")]
pub use self::diesel::sqlite::any_pending_migrations as any_pending_sqlite_migrations;
#[cfg(feature = "sqlite")]
pub use self::diesel::sqlite::run_migrations as run_sqlite_migrations;
