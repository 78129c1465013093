pub mod error;
pub mod profile;
pub(crate) mod time;
