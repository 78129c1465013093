#[cfg(feature = "sqlite")]
mod sqlite;

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::{env, fs};

use dotenvy::dotenv;

#[cfg(feature = "sqlite")]
pub use self::sqlite::{get_default_database, sqlite_migrations};
use crate::error::CliError;

const HOME_ENV: &str = "PROFILES_HOME";
const STATE_DIR_ENV: &str = "PROFILES_STATE_DIR";
const DEFAULT_STATE_DIR: &str = "/var/lib/tenant_profiles";

pub struct Migrate;

impl Migrate {
    /// Applies every pending migration to the database at `url`, or to the default database
    /// when no url is given.
    pub fn run(url: Option<String>) -> Result<(), CliError> {
        let url = match url {
            Some(url) => url,
            None => get_default_database()?,
        };
        log::info!("Migrating database: {}", url);
        match ConnectionUri::from_str(&url)? {
            #[cfg(feature = "sqlite")]
            ConnectionUri::Sqlite(connection_string) => sqlite_migrations(connection_string)?,
        }

        Ok(())
    }
}

/// The possible connection types and identifiers passed to the migrate command
pub enum ConnectionUri {
    #[cfg(feature = "sqlite")]
    Sqlite(String),
}

impl std::fmt::Display for ConnectionUri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let string = match self {
            #[cfg(feature = "sqlite")]
            ConnectionUri::Sqlite(sqlite) => sqlite,
        };
        f.write_str(string)
    }
}

impl FromStr for ConnectionUri {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            // check specifically so it does not pass to sqlite
            "memory" => Err(CliError::ActionError(format!(
                "No compatible connection type: {}",
                s
            ))),
            #[cfg(feature = "sqlite")]
            _ => Ok(ConnectionUri::Sqlite(s.into())),
            #[cfg(not(feature = "sqlite"))]
            _ => Err(CliError::ActionError(format!(
                "No compatible connection type: {}",
                s
            ))),
        }
    }
}

/// Where the profile database lives on this host
#[derive(Debug)]
struct ProfilesEnvironment {
    state_dir: Option<String>,
    home_dir: Option<String>,
    default_dir: &'static str,
}

impl ProfilesEnvironment {
    pub fn load() -> Self {
        dotenv().ok();
        ProfilesEnvironment {
            state_dir: env::var(STATE_DIR_ENV).ok(),
            home_dir: env::var(HOME_ENV).ok(),
            default_dir: DEFAULT_STATE_DIR,
        }
    }

    fn try_canonicalize<P: Into<PathBuf>>(dir: P) -> PathBuf {
        let dir: PathBuf = dir.into();
        fs::canonicalize(dir.clone()).unwrap_or(dir)
    }

    /// Returns the path to the state directory
    ///
    /// If `PROFILES_STATE_DIR` is set, returns `PROFILES_STATE_DIR`.
    /// If `PROFILES_HOME` is set, returns `PROFILES_HOME/data`.
    /// Otherwise, returns the default directory `/var/lib/tenant_profiles`
    pub fn get_state_path(&self) -> PathBuf {
        log::debug!("{:?}", self);
        if let Some(state_dir) = self.state_dir.as_ref() {
            Self::try_canonicalize(PathBuf::from(&state_dir))
        } else if let Some(home_dir) = self.home_dir.as_ref() {
            Self::try_canonicalize(Path::new(&home_dir).join("data"))
        } else {
            Self::try_canonicalize(PathBuf::from(&self.default_dir))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_is_not_a_migration_target() {
        assert!(ConnectionUri::from_str("memory").is_err());
    }

    #[test]
    fn test_state_dir_wins_over_home_dir() {
        let environment = ProfilesEnvironment {
            state_dir: Some("/tmp/profiles-state-does-not-exist".into()),
            home_dir: Some("/tmp/profiles-home".into()),
            default_dir: DEFAULT_STATE_DIR,
        };
        assert_eq!(
            environment.get_state_path(),
            PathBuf::from("/tmp/profiles-state-does-not-exist")
        );
    }

    #[test]
    fn test_home_dir_uses_data_subdirectory() {
        let environment = ProfilesEnvironment {
            state_dir: None,
            home_dir: Some("/tmp/profiles-home-does-not-exist".into()),
            default_dir: DEFAULT_STATE_DIR,
        };
        assert_eq!(
            environment.get_state_path(),
            PathBuf::from("/tmp/profiles-home-does-not-exist/data")
        );
    }
}
