//! Factories that hand out stores sharing one backend.

#[cfg(feature = "diesel")]
pub(crate) mod pool;
#[cfg(all(feature = "store-factory", feature = "sqlite"))]
pub mod sqlite;

/// An abstract factory for creating stores backed by the same storage
#[cfg(feature = "store-factory")]
pub trait StoreFactory {
    /// Get a new `ProfileStore`
    fn get_profile_store(&self) -> Box<dyn crate::modules::profile::ProfileStore>;
}
