//! Database-backed implementation of the [ProfileStore], powered by [diesel].

pub mod models;
mod operations;

use std::sync::{Arc, RwLock};

use diesel::r2d2::{ConnectionManager, Pool};

use crate::modules::time::get_current_time;
use crate::store::pool::ConnectionPool;

use super::{validate_key, Profile, ProfileKey, ProfilePatch, ProfileStore, ProfileStoreError};

use models::ProfileModel;
use operations::{
    create_profile::ProfileStoreCreateProfile as _, delete_profile::ProfileStoreDeleteProfile as _,
    search_profiles::ProfileStoreSearchProfiles as _,
    update_profile::ProfileStoreUpdateProfile as _, ProfileStoreOperations,
};

/// Manages creating, updating, searching and deleting profiles in the database
pub struct DieselProfileStore<C: diesel::r2d2::R2D2Connection + 'static> {
    connection_pool: ConnectionPool<C>,
}

impl<C: diesel::r2d2::R2D2Connection> DieselProfileStore<C> {
    /// Creates a new DieselProfileStore
    ///
    /// # Arguments
    ///
    ///  * `connection_pool`: connection pool to the database
    pub fn new(connection_pool: Pool<ConnectionManager<C>>) -> Self {
        DieselProfileStore {
            connection_pool: connection_pool.into(),
        }
    }

    /// Create a new `DieselProfileStore` with write exclusivity enabled.
    ///
    /// Write exclusivity is enforced by providing a connection pool that is wrapped in a
    /// [`RwLock`]. This ensures that there may be only one writer, but many readers.
    ///
    /// # Arguments
    ///
    ///  * `connection_pool`: read-write lock-guarded connection pool for the database
    pub fn new_with_write_exclusivity(
        connection_pool: Arc<RwLock<Pool<ConnectionManager<C>>>>,
    ) -> Self {
        Self {
            connection_pool: connection_pool.into(),
        }
    }
}

#[cfg(feature = "sqlite")]
impl ProfileStore for DieselProfileStore<diesel::sqlite::SqliteConnection> {
    fn create_profile(&self, profile: Profile) -> Result<String, ProfileStoreError> {
        self.connection_pool.execute_write(|connection| {
            ProfileStoreOperations::new(connection).create_profile(profile)
        })
    }

    fn delete_profile(
        &self,
        profile_id: &str,
        tenant_id: &str,
    ) -> Result<bool, ProfileStoreError> {
        validate_key(profile_id, tenant_id)?;
        self.connection_pool.execute_write(|connection| {
            ProfileStoreOperations::new(connection).delete_profile(profile_id, tenant_id)
        })
    }

    fn search_profiles(
        &self,
        query: &str,
        limit: u32,
        offset: u32,
        sort_by: &str,
        tenant_id: &str,
    ) -> Result<Vec<Profile>, ProfileStoreError> {
        let models = self.connection_pool.execute_read(|connection| {
            ProfileStoreOperations::new(connection)
                .search_profiles(query, limit, offset, sort_by, tenant_id)
        })?;

        let returned = models.len();
        let profiles = models
            .into_iter()
            .filter(|model| model.tenant_id == tenant_id)
            .map(Profile::from)
            .collect::<Vec<_>>();
        if profiles.len() != returned {
            log::warn!(
                "Dropped {} profile(s) outside tenant {} from search results",
                returned - profiles.len(),
                tenant_id
            );
        }

        Ok(profiles)
    }

    fn update_profile(
        &self,
        filter: &ProfileKey,
        patch: ProfilePatch,
    ) -> Result<bool, ProfileStoreError> {
        filter.validate()?;
        let patch = patch.normalized();
        if patch.is_empty() {
            return Ok(false);
        }
        log::debug!(
            "Updating {:?} of profile {} in tenant {}",
            patch.columns(),
            filter.profile_id,
            filter.tenant_id
        );

        self.connection_pool.execute_write(|connection| {
            ProfileStoreOperations::new(connection).update_profile(
                filter,
                patch,
                get_current_time(),
            )
        })
    }

    fn clone_box(&self) -> Box<dyn ProfileStore> {
        Box::new(Self {
            connection_pool: self.connection_pool.clone(),
        })
    }
}

impl From<ProfileModel> for Profile {
    fn from(model: ProfileModel) -> Self {
        Self {
            tenant_id: model.tenant_id,
            profile_id: model.profile_id,
            full_name: model.full_name,
            gender: model.gender,
            email: model.email,
            mobile: model.mobile,
            birth_date: model.birth_date,
            city_id: model.city_id,
            country_id: model.country_id,
            address: model.address,
            latitude: model.latitude,
            longitude: model.longitude,
            profile_image_url: model.profile_image_url,
            active: model.active,
            created_by: model.created_by,
            created_at: model.created_at,
            updated_by: model.updated_by,
            updated_at: model.updated_at,
            deleted_by: model.deleted_by,
            deleted_at: model.deleted_at,
        }
    }
}
