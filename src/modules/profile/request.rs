//! Typed requests from the outer surface, and the rules for turning them into profiles.
//!
//! The tenant always comes from the caller's context, never from the request body, and a new
//! profile's id is always generated here.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::modules::error::InvalidStateError;

use super::store::{is_blank, Profile, ProfileBuilder, ProfilePatch};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateProfileRequest {
    pub full_name: String,
    pub gender: String,
    #[serde(alias = "email_id")]
    pub email: String,
    pub mobile: String,
    pub birth_date: Option<NaiveDateTime>,
    pub city_id: String,
    pub country_id: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl CreateProfileRequest {
    /// Builds the profile to store.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidStateError` if a required field is blank
    pub fn into_profile(
        self,
        tenant_id: &str,
        profile_id: String,
    ) -> Result<Profile, InvalidStateError> {
        let mut builder = ProfileBuilder::new()
            .with_tenant_id(tenant_id.to_string())
            .with_profile_id(profile_id)
            .with_full_name(self.full_name)
            .with_gender(self.gender)
            .with_email(self.email)
            .with_mobile(self.mobile)
            .with_city_id(self.city_id)
            .with_country_id(self.country_id)
            .with_address(self.address)
            .with_active(true);
        if let Some(birth_date) = self.birth_date {
            builder = builder.with_birth_date(birth_date);
        }
        if let Some(latitude) = self.latitude {
            builder = builder.with_latitude(latitude);
        }
        if let Some(longitude) = self.longitude {
            builder = builder.with_longitude(longitude);
        }
        builder.build()
    }
}

/// The fields a caller may change. Empty values mean "leave as is".
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateProfileRequest {
    pub full_name: String,
    pub gender: String,
    #[serde(alias = "email_id")]
    pub email: String,
    pub mobile: String,
    pub birth_date: Option<NaiveDateTime>,
    pub address: String,
}

impl UpdateProfileRequest {
    pub fn into_patch(self) -> ProfilePatch {
        ProfilePatch {
            full_name: Some(self.full_name),
            gender: Some(self.gender),
            email: Some(self.email),
            mobile: Some(self.mobile),
            birth_date: self.birth_date,
            address: Some(self.address),
            ..ProfilePatch::default()
        }
        .normalized()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchProfileRequest {
    pub query: String,
    pub sort_by: String,
    /// `0` returns every match
    pub limit: u32,
    pub offset: u32,
}

/// Reply to a successful create
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreateProfileResponse {
    pub tenant_id: String,
    pub profile_id: String,
}

/// Reply to delete and update; `status` is `"true"` or `"false"`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

impl From<bool> for StatusResponse {
    fn from(status: bool) -> Self {
        Self {
            status: status.to_string(),
        }
    }
}

/// Picks the caller's tenant, falling back to `default_tenant` when none was given.
pub fn resolve_tenant(requested: Option<&str>, default_tenant: &str) -> String {
    match requested {
        Some(tenant) if !is_blank(tenant) => tenant.trim().to_string(),
        _ => default_tenant.to_string(),
    }
}

/// Generates the id for a new profile.
pub fn generate_profile_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_tenant() {
        assert_eq!(resolve_tenant(Some("acme"), "default"), "acme");
        assert_eq!(resolve_tenant(Some(""), "default"), "default");
        assert_eq!(resolve_tenant(None, "default"), "default");
    }

    #[test]
    fn test_generated_ids_are_unique_uuids() {
        let first = generate_profile_id();
        let second = generate_profile_id();
        assert_ne!(first, second);
        assert!(Uuid::parse_str(&first).is_ok());
    }

    #[test]
    fn test_create_request_accepts_email_id_alias() {
        let request: CreateProfileRequest = serde_json::from_str(
            r#"{"full_name":"Nimesh","email_id":"n@x.com","mobile":"888","city_id":"BLR"}"#,
        )
        .unwrap();
        let profile = request.into_profile("default", "101".into()).unwrap();
        assert_eq!(profile.email(), "n@x.com");
        assert_eq!(profile.city_id(), Some("BLR"));
        assert_eq!(profile.gender(), None);
        assert!(profile.active());
    }

    #[test]
    fn test_create_request_missing_mobile_fails() {
        let request = CreateProfileRequest {
            full_name: "Nimesh".into(),
            email: "n@x.com".into(),
            ..CreateProfileRequest::default()
        };
        assert!(request.into_profile("default", "101".into()).is_err());
    }

    #[test]
    fn test_empty_update_request_is_empty_patch() {
        assert!(UpdateProfileRequest::default().into_patch().is_empty());

        let patch = UpdateProfileRequest {
            full_name: "New Name".into(),
            ..UpdateProfileRequest::default()
        }
        .into_patch();
        assert_eq!(patch.columns(), vec!["full_name"]);
    }

    #[test]
    fn test_status_response() {
        assert_eq!(
            serde_json::to_string(&StatusResponse::from(true)).unwrap(),
            r#"{"status":"true"}"#
        );
    }
}
