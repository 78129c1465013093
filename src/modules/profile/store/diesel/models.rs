use chrono::NaiveDateTime;

use crate::modules::profile::store::{Profile, ProfilePatch};
use crate::schema::profiles;

#[derive(Insertable, Selectable, Queryable, QueryableByName, PartialEq, Debug)]
#[diesel(table_name = profiles)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ProfileModel {
    pub tenant_id: String,
    pub profile_id: String,
    pub full_name: String,
    pub gender: Option<String>,
    pub email: String,
    pub mobile: String,
    pub birth_date: Option<NaiveDateTime>,
    pub city_id: Option<String>,
    pub country_id: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub profile_image_url: Option<String>,
    pub active: bool,
    pub created_by: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_by: Option<String>,
    pub updated_at: NaiveDateTime,
    pub deleted_by: Option<String>,
    pub deleted_at: Option<NaiveDateTime>,
}

impl From<Profile> for ProfileModel {
    fn from(profile: Profile) -> Self {
        ProfileModel {
            tenant_id: profile.tenant_id,
            profile_id: profile.profile_id,
            full_name: profile.full_name,
            gender: profile.gender,
            email: profile.email,
            mobile: profile.mobile,
            birth_date: profile.birth_date,
            city_id: profile.city_id,
            country_id: profile.country_id,
            address: profile.address,
            latitude: profile.latitude,
            longitude: profile.longitude,
            profile_image_url: profile.profile_image_url,
            active: profile.active,
            created_by: profile.created_by,
            created_at: profile.created_at,
            updated_by: profile.updated_by,
            updated_at: profile.updated_at,
            deleted_by: profile.deleted_by,
            deleted_at: profile.deleted_at,
        }
    }
}

/// The columns an update writes. `None` fields are left out of the `SET` clause.
#[derive(AsChangeset, Debug)]
#[diesel(table_name = profiles)]
pub struct ProfileChangeset {
    pub full_name: Option<String>,
    pub gender: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub birth_date: Option<NaiveDateTime>,
    pub city_id: Option<String>,
    pub country_id: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub profile_image_url: Option<String>,
    pub active: Option<bool>,
    pub updated_by: Option<String>,
    pub updated_at: NaiveDateTime,
}

impl ProfileChangeset {
    pub fn new(patch: ProfilePatch, updated_at: NaiveDateTime) -> Self {
        ProfileChangeset {
            full_name: patch.full_name,
            gender: patch.gender,
            email: patch.email,
            mobile: patch.mobile,
            birth_date: patch.birth_date,
            city_id: patch.city_id,
            country_id: patch.country_id,
            address: patch.address,
            latitude: patch.latitude,
            longitude: patch.longitude,
            profile_image_url: patch.profile_image_url,
            active: patch.active,
            updated_by: patch.updated_by,
            updated_at,
        }
    }
}
