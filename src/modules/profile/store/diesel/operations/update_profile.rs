use chrono::NaiveDateTime;
use diesel::{dsl::update, prelude::*};

use crate::modules::profile::store::{
    diesel::models::ProfileChangeset, ProfileKey, ProfilePatch, ProfileStoreError,
};
use crate::schema::profiles;

use super::ProfileStoreOperations;

pub trait ProfileStoreUpdateProfile {
    /// Expects a normalized, non-empty patch.
    fn update_profile(
        &mut self,
        filter: &ProfileKey,
        patch: ProfilePatch,
        updated_at: NaiveDateTime,
    ) -> Result<bool, ProfileStoreError>;
}

#[cfg(feature = "sqlite")]
impl<'a> ProfileStoreUpdateProfile for ProfileStoreOperations<'a, diesel::sqlite::SqliteConnection> {
    fn update_profile(
        &mut self,
        filter: &ProfileKey,
        patch: ProfilePatch,
        updated_at: NaiveDateTime,
    ) -> Result<bool, ProfileStoreError> {
        let updated = update(
            profiles::table
                .filter(profiles::tenant_id.eq(&filter.tenant_id))
                .filter(profiles::profile_id.eq(&filter.profile_id)),
        )
        .set(ProfileChangeset::new(patch, updated_at))
        .execute(self.conn)?;

        Ok(updated > 0)
    }
}
