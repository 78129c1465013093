use diesel::{dsl::insert_into, RunQueryDsl};

use crate::modules::profile::store::{diesel::models::ProfileModel, Profile, ProfileStoreError};
use crate::schema::profiles;

use super::ProfileStoreOperations;

pub trait ProfileStoreCreateProfile {
    fn create_profile(&mut self, profile: Profile) -> Result<String, ProfileStoreError>;
}

#[cfg(feature = "sqlite")]
impl<'a> ProfileStoreCreateProfile for ProfileStoreOperations<'a, diesel::sqlite::SqliteConnection> {
    fn create_profile(&mut self, profile: Profile) -> Result<String, ProfileStoreError> {
        let profile_id = profile.profile_id.clone();

        // Key, email and mobile conflicts are left to the table constraints.
        insert_into(profiles::table)
            .values(ProfileModel::from(profile))
            .execute(self.conn)?;

        Ok(profile_id)
    }
}
