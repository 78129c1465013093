use diesel::{dsl::delete, prelude::*};

use crate::modules::profile::store::ProfileStoreError;
use crate::schema::profiles;

use super::ProfileStoreOperations;

pub trait ProfileStoreDeleteProfile {
    fn delete_profile(&mut self, profile_id: &str, tenant_id: &str)
        -> Result<bool, ProfileStoreError>;
}

#[cfg(feature = "sqlite")]
impl<'a> ProfileStoreDeleteProfile for ProfileStoreOperations<'a, diesel::sqlite::SqliteConnection> {
    fn delete_profile(
        &mut self,
        profile_id: &str,
        tenant_id: &str,
    ) -> Result<bool, ProfileStoreError> {
        let deleted = delete(
            profiles::table
                .filter(profiles::tenant_id.eq(tenant_id))
                .filter(profiles::profile_id.eq(profile_id)),
        )
        .execute(self.conn)?;

        Ok(deleted > 0)
    }
}
