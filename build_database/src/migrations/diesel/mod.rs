#[cfg(feature = "sqlite")]
pub(super) mod sqlite;
