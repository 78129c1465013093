//! Defines a basic representation of a tenant-scoped user profile.

#[cfg(feature = "diesel")]
pub mod diesel;
pub mod error;
pub mod memory;
mod patch;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::modules::error::{InvalidArgumentError, InvalidStateError};
use crate::modules::time::get_current_time;

pub use error::ProfileStoreError;
pub use patch::{is_blank, is_zero_time, ProfilePatch};

/// A user profile owned by a single tenant.
///
/// Identified by `(tenant_id, profile_id)`; neither half of the key changes after creation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    tenant_id: String,
    profile_id: String,
    full_name: String,
    gender: Option<String>,
    email: String,
    mobile: String,
    birth_date: Option<NaiveDateTime>,
    city_id: Option<String>,
    country_id: Option<String>,
    address: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    profile_image_url: Option<String>,
    active: bool,
    created_by: Option<String>,
    created_at: NaiveDateTime,
    updated_by: Option<String>,
    updated_at: NaiveDateTime,
    deleted_by: Option<String>,
    deleted_at: Option<NaiveDateTime>,
}

impl Profile {
    /// Returns the tenant that owns the profile
    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    /// Returns the profile's identifier within its tenant
    pub fn profile_id(&self) -> &str {
        &self.profile_id
    }

    /// Returns the composite key of the profile
    pub fn key(&self) -> ProfileKey {
        ProfileKey::new(&self.tenant_id, &self.profile_id)
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn gender(&self) -> Option<&str> {
        self.gender.as_deref()
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn mobile(&self) -> &str {
        &self.mobile
    }

    pub fn birth_date(&self) -> Option<&NaiveDateTime> {
        self.birth_date.as_ref()
    }

    pub fn city_id(&self) -> Option<&str> {
        self.city_id.as_deref()
    }

    pub fn country_id(&self) -> Option<&str> {
        self.country_id.as_deref()
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn latitude(&self) -> Option<f64> {
        self.latitude
    }

    pub fn longitude(&self) -> Option<f64> {
        self.longitude
    }

    /// Returns the location of the profile image, if one was attached
    pub fn profile_image_url(&self) -> Option<&str> {
        self.profile_image_url.as_deref()
    }

    pub fn active(&self) -> bool {
        self.active
    }

    pub fn created_by(&self) -> Option<&str> {
        self.created_by.as_deref()
    }

    pub fn created_at(&self) -> &NaiveDateTime {
        &self.created_at
    }

    pub fn updated_by(&self) -> Option<&str> {
        self.updated_by.as_deref()
    }

    pub fn updated_at(&self) -> &NaiveDateTime {
        &self.updated_at
    }

    /// Deletion audit columns. Deletes are hard deletes, so these are never set by this crate.
    pub fn deleted_by(&self) -> Option<&str> {
        self.deleted_by.as_deref()
    }

    pub fn deleted_at(&self) -> Option<&NaiveDateTime> {
        self.deleted_at.as_ref()
    }
}

/// Builder for profiles.
///
/// tenant_id, profile_id, full_name, email and mobile are required and must not be blank.
#[derive(Default)]
pub struct ProfileBuilder {
    tenant_id: Option<String>,
    profile_id: Option<String>,
    full_name: Option<String>,
    gender: Option<String>,
    email: Option<String>,
    mobile: Option<String>,
    birth_date: Option<NaiveDateTime>,
    city_id: Option<String>,
    country_id: Option<String>,
    address: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    profile_image_url: Option<String>,
    active: Option<bool>,
    created_by: Option<String>,
    created_at: Option<NaiveDateTime>,
}

impl ProfileBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tenant that owns the profile
    ///
    /// This is a required field for the final Profile struct
    pub fn with_tenant_id(mut self, tenant_id: String) -> ProfileBuilder {
        self.tenant_id = Some(tenant_id);
        self
    }

    /// Sets the profile id
    ///
    /// This is a required field for the final Profile struct. The id is generated by the caller;
    /// stores never assign one.
    pub fn with_profile_id(mut self, profile_id: String) -> ProfileBuilder {
        self.profile_id = Some(profile_id);
        self
    }

    /// Sets the full name
    ///
    /// This is a required field for the final Profile struct
    pub fn with_full_name(mut self, full_name: String) -> ProfileBuilder {
        self.full_name = Some(full_name);
        self
    }

    pub fn with_gender(mut self, gender: String) -> ProfileBuilder {
        self.gender = Some(gender);
        self
    }

    /// Sets the email address
    ///
    /// This is a required field for the final Profile struct and must be unique across all
    /// tenants
    pub fn with_email(mut self, email: String) -> ProfileBuilder {
        self.email = Some(email);
        self
    }

    /// Sets the mobile number
    ///
    /// This is a required field for the final Profile struct and must be unique across all
    /// tenants
    pub fn with_mobile(mut self, mobile: String) -> ProfileBuilder {
        self.mobile = Some(mobile);
        self
    }

    pub fn with_birth_date(mut self, birth_date: NaiveDateTime) -> ProfileBuilder {
        self.birth_date = Some(birth_date);
        self
    }

    pub fn with_city_id(mut self, city_id: String) -> ProfileBuilder {
        self.city_id = Some(city_id);
        self
    }

    pub fn with_country_id(mut self, country_id: String) -> ProfileBuilder {
        self.country_id = Some(country_id);
        self
    }

    pub fn with_address(mut self, address: String) -> ProfileBuilder {
        self.address = Some(address);
        self
    }

    pub fn with_latitude(mut self, latitude: f64) -> ProfileBuilder {
        self.latitude = Some(latitude);
        self
    }

    pub fn with_longitude(mut self, longitude: f64) -> ProfileBuilder {
        self.longitude = Some(longitude);
        self
    }

    pub fn with_profile_image_url(mut self, profile_image_url: String) -> ProfileBuilder {
        self.profile_image_url = Some(profile_image_url);
        self
    }

    /// Sets the active flag; profiles are active unless told otherwise
    pub fn with_active(mut self, active: bool) -> ProfileBuilder {
        self.active = Some(active);
        self
    }

    pub fn with_created_by(mut self, created_by: String) -> ProfileBuilder {
        self.created_by = Some(created_by);
        self
    }

    /// Sets the creation time; defaults to the current time
    pub fn with_created_at(mut self, created_at: NaiveDateTime) -> ProfileBuilder {
        self.created_at = Some(created_at);
        self
    }

    /// Builds the profile
    ///
    /// Blank optional strings and a zero birth date are stored as unset.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidStateError` if `tenant_id`, `profile_id`, `full_name`, `email` or
    /// `mobile` are missing or blank
    pub fn build(self) -> Result<Profile, InvalidStateError> {
        let created_at = self.created_at.unwrap_or_else(get_current_time);
        Ok(Profile {
            tenant_id: required(self.tenant_id, "tenant_id")?,
            profile_id: required(self.profile_id, "profile_id")?,
            full_name: required(self.full_name, "full_name")?,
            gender: self.gender.filter(|value| !is_blank(value)),
            email: required(self.email, "email")?,
            mobile: required(self.mobile, "mobile")?,
            birth_date: self.birth_date.filter(|value| !is_zero_time(value)),
            city_id: self.city_id.filter(|value| !is_blank(value)),
            country_id: self.country_id.filter(|value| !is_blank(value)),
            address: self.address.filter(|value| !is_blank(value)),
            latitude: self.latitude,
            longitude: self.longitude,
            profile_image_url: self.profile_image_url.filter(|value| !is_blank(value)),
            active: self.active.unwrap_or(true),
            created_by: self.created_by.filter(|value| !is_blank(value)),
            created_at,
            updated_by: None,
            updated_at: created_at,
            deleted_by: None,
            deleted_at: None,
        })
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, InvalidStateError> {
    value.filter(|value| !is_blank(value)).ok_or_else(|| {
        InvalidStateError::with_message(format!("A {} is required to build a Profile", field))
    })
}

/// The `(tenant_id, profile_id)` pair that selects exactly one profile.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProfileKey {
    pub tenant_id: String,
    pub profile_id: String,
}

impl ProfileKey {
    pub fn new(tenant_id: &str, profile_id: &str) -> Self {
        Self {
            tenant_id: tenant_id.to_string(),
            profile_id: profile_id.to_string(),
        }
    }

    /// Checks that both halves of the key are present.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidArgumentError` naming the first blank half
    pub fn validate(&self) -> Result<(), InvalidArgumentError> {
        validate_key(&self.profile_id, &self.tenant_id)
    }
}

pub(crate) fn validate_key(profile_id: &str, tenant_id: &str) -> Result<(), InvalidArgumentError> {
    if is_blank(tenant_id) {
        return Err(InvalidArgumentError::new(
            "tenant_id".to_string(),
            "must not be empty".to_string(),
        ));
    }
    if is_blank(profile_id) {
        return Err(InvalidArgumentError::new(
            "profile_id".to_string(),
            "must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Defines methods for CRUD operations on tenant-scoped profiles without defining a storage
/// strategy
pub trait ProfileStore: Sync + Send {
    /// Adds a profile to the underlying storage and returns its profile id
    ///
    /// # Arguments
    ///
    ///  * `profile` - The profile to be added, with `tenant_id` and `profile_id` already set
    ///
    /// # Errors
    ///
    /// Returns `ConstraintViolation` if the key, email or mobile is already taken, or
    /// `StorageUnavailable` if the backend fails.
    fn create_profile(&self, profile: Profile) -> Result<String, ProfileStoreError>;

    /// Removes the profile matching both `profile_id` and `tenant_id`
    ///
    /// Returns `false`, not an error, when nothing matched.
    fn delete_profile(&self, profile_id: &str, tenant_id: &str)
        -> Result<bool, ProfileStoreError>;

    /// Lists a page of the tenant's profiles
    ///
    /// # Arguments
    ///
    ///  * `query` - a predicate over the profile columns; empty matches every profile
    ///  * `limit` - maximum number of profiles to return; `0` means no limit, not an empty page
    ///  * `offset` - number of matching profiles to skip
    ///  * `sort_by` - column and direction, e.g. `full_name DESC`; empty leaves the order to
    ///    the backend
    ///  * `tenant_id` - only this tenant's profiles are ever returned, whatever `query` says
    fn search_profiles(
        &self,
        query: &str,
        limit: u32,
        offset: u32,
        sort_by: &str,
        tenant_id: &str,
    ) -> Result<Vec<Profile>, ProfileStoreError>;

    /// Applies the set, non-empty fields of `patch` to the profile selected by `filter`
    ///
    /// Returns `true` if a profile matched and at least one field was written. A patch with
    /// nothing left after dropping empty strings and zero times is a no-op returning `false`.
    fn update_profile(
        &self,
        filter: &ProfileKey,
        patch: ProfilePatch,
    ) -> Result<bool, ProfileStoreError>;

    /// Reserved. Images go through a blob store and are attached with
    /// [`update_profile`](ProfileStore::update_profile) instead.
    fn upload_profile_image(
        &self,
        _profile_id: &str,
        _image: &[u8],
    ) -> Result<bool, ProfileStoreError> {
        Err(ProfileStoreError::NotImplemented(
            "upload_profile_image".to_string(),
        ))
    }

    /// Clone into a boxed, dynamically dispatched store
    fn clone_box(&self) -> Box<dyn ProfileStore>;
}

impl Clone for Box<dyn ProfileStore> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

impl<PS> ProfileStore for Box<PS>
where
    PS: ProfileStore + ?Sized,
{
    fn create_profile(&self, profile: Profile) -> Result<String, ProfileStoreError> {
        (**self).create_profile(profile)
    }

    fn delete_profile(
        &self,
        profile_id: &str,
        tenant_id: &str,
    ) -> Result<bool, ProfileStoreError> {
        (**self).delete_profile(profile_id, tenant_id)
    }

    fn search_profiles(
        &self,
        query: &str,
        limit: u32,
        offset: u32,
        sort_by: &str,
        tenant_id: &str,
    ) -> Result<Vec<Profile>, ProfileStoreError> {
        (**self).search_profiles(query, limit, offset, sort_by, tenant_id)
    }

    fn update_profile(
        &self,
        filter: &ProfileKey,
        patch: ProfilePatch,
    ) -> Result<bool, ProfileStoreError> {
        (**self).update_profile(filter, patch)
    }

    fn upload_profile_image(
        &self,
        profile_id: &str,
        image: &[u8],
    ) -> Result<bool, ProfileStoreError> {
        (**self).upload_profile_image(profile_id, image)
    }

    fn clone_box(&self) -> Box<dyn ProfileStore> {
        (**self).clone_box()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> ProfileBuilder {
        ProfileBuilder::new()
            .with_tenant_id("default".into())
            .with_profile_id("101".into())
            .with_full_name("Nimesh".into())
            .with_email("nimesh@example.com".into())
            .with_mobile("8888800000".into())
    }

    #[test]
    fn test_build_defaults_lifecycle_fields() {
        let profile = builder().build().unwrap();
        assert!(profile.active());
        assert_eq!(profile.created_at(), profile.updated_at());
        assert_eq!(profile.deleted_at(), None);
        assert_eq!(profile.deleted_by(), None);
        assert_eq!(profile.key(), ProfileKey::new("default", "101"));
    }

    #[test]
    fn test_build_rejects_blank_required_fields() {
        let err = builder().with_email("  ".into()).build().unwrap_err();
        assert_eq!(err.to_string(), "A email is required to build a Profile");

        let err = ProfileBuilder::new()
            .with_tenant_id("default".into())
            .with_full_name("Nimesh".into())
            .build()
            .unwrap_err();
        assert_eq!(err.to_string(), "A profile_id is required to build a Profile");
    }

    #[test]
    fn test_build_drops_empty_optional_values() {
        let profile = builder()
            .with_gender(String::new())
            .with_address("".into())
            .with_birth_date(NaiveDateTime::default())
            .with_city_id("BLR".into())
            .build()
            .unwrap();
        assert_eq!(profile.gender(), None);
        assert_eq!(profile.address(), None);
        assert_eq!(profile.birth_date(), None);
        assert_eq!(profile.city_id(), Some("BLR"));
    }

    #[test]
    fn test_key_validation() {
        assert!(ProfileKey::new("default", "101").validate().is_ok());
        let err = ProfileKey::new("", "101").validate().unwrap_err();
        assert_eq!(err.argument(), "tenant_id");
        let err = ProfileKey::new("default", " ").validate().unwrap_err();
        assert_eq!(err.argument(), "profile_id");
    }
}
