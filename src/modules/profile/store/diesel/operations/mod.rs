//! Provides [`ProfileStore`](crate::modules::profile::ProfileStore) operations implemented for a
//! diesel backend

pub(super) mod create_profile;
pub(super) mod delete_profile;
pub(super) mod search_profiles;
pub(super) mod update_profile;

pub(super) struct ProfileStoreOperations<'a, C> {
    conn: &'a mut C,
}

impl<'a, C> ProfileStoreOperations<'a, C>
where
    C: diesel::Connection,
{
    pub fn new(conn: &'a mut C) -> Self {
        ProfileStoreOperations { conn }
    }
}
