#[cfg(feature = "database")]
extern crate diesel;
pub mod build_database;
pub mod error;
pub mod migrations;
