#[macro_use]
extern crate anyhow;

#[cfg(feature = "diesel")]
#[macro_use]
extern crate diesel;

#[cfg(feature = "store-factory")]
pub mod database;
pub mod env_config;
pub mod gateway;
pub mod modules;
#[cfg(feature = "diesel")]
pub mod schema;
pub mod store;
pub mod subcommands;

pub use modules::error;
pub use modules::profile;
