use anyhow::Error;
use paste::paste;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::{env, ops::Deref, sync::Arc};

use dotenv::dotenv;

const CONFIG_PATH_ENV: &str = "CONFIG_PATH";
const DATABASE_URL_ENV: &str = "DATABASE_URL";

#[derive(Debug, Deserialize)]
pub struct SecretString(Secret<String>);

impl SecretString {
    pub fn new(value: String) -> Self {
        SecretString(Secret::new(value))
    }

    pub fn expose_secret(&self) -> &String {
        self.0.expose_secret()
    }
}

impl Default for SecretString {
    fn default() -> Self {
        SecretString(Secret::new("".to_string()))
    }
}

#[derive(Deserialize, Debug)]
pub struct Config {
    /// Tenant used when a request does not name one.
    /// TOML key: `default_tenant`
    #[serde(default = "default_default_tenant")]
    pub default_tenant: String,

    #[serde(default = "default_database")]
    pub database: DatabaseConfig,

    #[serde(default = "default_blob_store")]
    pub blob_store: BlobStoreConfig,
}

#[derive(Deserialize, Debug)]
pub struct DatabaseConfig {
    /// A SQLite file path, or `memory`. Unset means the default database under the state
    /// directory. Overridden by `DATABASE_URL`.
    #[serde(default = "default_url")]
    pub url: Option<SecretString>,

    /// Upper bound on pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Idle connections kept open; clamped to `max_connections`.
    #[serde(default = "default_min_idle")]
    pub min_idle: u32,

    /// How long a connection waits on a locked database before failing.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u32,
}

#[derive(Deserialize, Debug)]
pub struct BlobStoreConfig {
    /// Directory uploaded images are written below
    #[serde(default = "default_root")]
    pub root: String,

    /// Prepended to an object's name to form its public URL
    #[serde(default = "default_public_url_prefix")]
    pub public_url_prefix: String,
}

/// Loads `.env`, then the TOML file named by `CONFIG_PATH`.
///
/// Without `CONFIG_PATH` every setting takes its default. `DATABASE_URL`, when set, wins over
/// the file.
pub fn read_config() -> Result<Config, Error> {
    dotenv().ok();
    let mut config = match env::var(CONFIG_PATH_ENV) {
        Ok(config_path) => {
            let text = std::fs::read_to_string(&config_path)
                .map_err(|err| anyhow!("failed to read config {}: {}", config_path, err))?;
            parse_config(&text)?
        }
        Err(_) => {
            log::debug!("{CONFIG_PATH_ENV} environment variable not set, using defaults");
            Config::default()
        }
    };

    if let Ok(url) = env::var(DATABASE_URL_ENV) {
        config.database.url = Some(SecretString::new(url));
    }

    Ok(config)
}

pub fn parse_config(text: &str) -> Result<Config, Error> {
    toml::from_str(text).map_err(|err| anyhow!("failed to parse config: {}", err))
}

/// A thread-safe reference-counting object that represents
/// a [`Config`] instance.
#[derive(Debug, Clone)]
pub struct SharedConfig {
    config: Arc<Config>,
}

impl SharedConfig {
    /// Constructs a new `SharedConfig`.
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

impl Deref for SharedConfig {
    type Target = Config;

    fn deref(&self) -> &Self::Target {
        self.config.as_ref()
    }
}

macro_rules! define_defaults {
    ($ty_name:ident { $($name:ident: $ty:ty = $default:expr,)* }) => {
        define_defaults! { $($name: $ty = $default,)* }
        paste! {
            impl Default for $ty_name {
                fn default() -> Self {
                    Self {
                        $($name: [<default_ $name>](),)*
                    }
                }
            }
        }
    };
    ($($name:ident: $ty:ty = $default:expr,)*) => {
        paste! {
            $(
                fn [<default_ $name>]() -> $ty {
                    $default
                }
            )*
        }
    };
}

define_defaults!(Config {
    default_tenant: String = "default".to_owned(),
    database: DatabaseConfig = DatabaseConfig::default(),
    blob_store: BlobStoreConfig = BlobStoreConfig::default(),
});

define_defaults!(DatabaseConfig {
    url: Option<SecretString> = None,
    max_connections: u32 = 100,
    min_idle: u32 = 5,
    busy_timeout_ms: u32 = 2000,
});

define_defaults!(BlobStoreConfig {
    root: String = "/var/lib/tenant_profiles/blobs".to_owned(),
    public_url_prefix: String = "file:///var/lib/tenant_profiles/blobs/".to_owned(),
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.default_tenant, "default");
        assert!(config.database.url.is_none());
        assert_eq!(config.database.max_connections, 100);
        assert_eq!(config.database.min_idle, 5);
        assert_eq!(config.database.busy_timeout_ms, 2000);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = parse_config(
            r#"
            default_tenant = "acme"

            [database]
            url = "/tmp/profiles.db"
            max_connections = 4
            "#,
        )
        .unwrap();
        assert_eq!(config.default_tenant, "acme");
        assert_eq!(
            config.database.url.as_ref().map(|url| url.expose_secret().as_str()),
            Some("/tmp/profiles.db")
        );
        assert_eq!(config.database.max_connections, 4);
        assert_eq!(config.database.min_idle, 5);
        assert_eq!(
            config.blob_store.public_url_prefix,
            "file:///var/lib/tenant_profiles/blobs/"
        );
    }

    #[test]
    fn test_debug_hides_database_url() {
        let config = parse_config("[database]\nurl = \"secret.db\"\n").unwrap();
        assert!(!format!("{:?}", config).contains("secret.db"));
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        assert!(parse_config("default_tenant = [").is_err());
    }
}
