//! Sparse updates to a profile.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::Profile;

/// Returns true if `value` is empty or only whitespace.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Returns true for the zero time, i.e. what a defaulted timestamp field decodes to.
pub fn is_zero_time(value: &NaiveDateTime) -> bool {
    *value == NaiveDateTime::default()
}

/// The fields of a profile that may be changed after creation.
///
/// `None` leaves a column untouched. Empty strings and the zero time are treated the same as
/// `None`, so a patch can never clear a column. `tenant_id` and `profile_id` are deliberately
/// absent: a profile's key is immutable.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfilePatch {
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
}

impl ProfilePatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// A patch that only attaches an image location.
    pub fn profile_image_url(url: String) -> Self {
        Self {
            profile_image_url: Some(url),
            ..Self::default()
        }
    }

    /// Drops every empty string and zero time. Whitespace is a value like any other.
    pub fn normalized(self) -> Self {
        let text = |value: Option<String>| value.filter(|value| !value.is_empty());
        Self {
            full_name: text(self.full_name),
            gender: text(self.gender),
            email: text(self.email),
            mobile: text(self.mobile),
            birth_date: self.birth_date.filter(|value| !is_zero_time(value)),
            city_id: text(self.city_id),
            country_id: text(self.country_id),
            address: text(self.address),
            latitude: self.latitude,
            longitude: self.longitude,
            profile_image_url: text(self.profile_image_url),
            active: self.active,
            updated_by: text(self.updated_by),
        }
    }

    /// Returns true if the patch would change no profile column.
    ///
    /// `updated_by` alone does not count as a change.
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.gender.is_none()
            && self.email.is_none()
            && self.mobile.is_none()
            && self.birth_date.is_none()
            && self.city_id.is_none()
            && self.country_id.is_none()
            && self.address.is_none()
            && self.latitude.is_none()
            && self.longitude.is_none()
            && self.profile_image_url.is_none()
            && self.active.is_none()
    }

    /// Names of the columns this patch writes, in schema order.
    pub fn columns(&self) -> Vec<&'static str> {
        let mut columns = Vec::new();
        let mut push = |set: bool, name: &'static str| {
            if set {
                columns.push(name)
            }
        };
        push(self.full_name.is_some(), "full_name");
        push(self.gender.is_some(), "gender");
        push(self.email.is_some(), "email");
        push(self.mobile.is_some(), "mobile");
        push(self.birth_date.is_some(), "birth_date");
        push(self.city_id.is_some(), "city_id");
        push(self.country_id.is_some(), "country_id");
        push(self.address.is_some(), "address");
        push(self.latitude.is_some(), "latitude");
        push(self.longitude.is_some(), "longitude");
        push(self.profile_image_url.is_some(), "profile_image_url");
        push(self.active.is_some(), "active");
        push(self.updated_by.is_some(), "updated_by");
        columns
    }

    /// Writes the set fields onto `profile` and stamps `updated_at`.
    ///
    /// Expects a normalized patch.
    pub(crate) fn apply_to(self, profile: &mut Profile, updated_at: NaiveDateTime) {
        if let Some(full_name) = self.full_name {
            profile.full_name = full_name;
        }
        if let Some(email) = self.email {
            profile.email = email;
        }
        if let Some(mobile) = self.mobile {
            profile.mobile = mobile;
        }
        if let Some(active) = self.active {
            profile.active = active;
        }
        profile.gender = self.gender.or(profile.gender.take());
        profile.birth_date = self.birth_date.or(profile.birth_date);
        profile.city_id = self.city_id.or(profile.city_id.take());
        profile.country_id = self.country_id.or(profile.country_id.take());
        profile.address = self.address.or(profile.address.take());
        profile.latitude = self.latitude.or(profile.latitude);
        profile.longitude = self.longitude.or(profile.longitude);
        profile.profile_image_url = self
            .profile_image_url
            .or(profile.profile_image_url.take());
        profile.updated_by = self.updated_by.or(profile.updated_by.take());
        profile.updated_at = updated_at;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_drops_empty_values() {
        let patch = ProfilePatch {
            full_name: Some("New Name".into()),
            gender: Some(String::new()),
            address: Some(String::new()),
            birth_date: Some(NaiveDateTime::default()),
            latitude: Some(0.0),
            ..ProfilePatch::default()
        }
        .normalized();

        assert_eq!(patch.full_name.as_deref(), Some("New Name"));
        assert_eq!(patch.gender, None);
        assert_eq!(patch.address, None);
        assert_eq!(patch.birth_date, None);
        // zero is a real coordinate, not an unset value
        assert_eq!(patch.latitude, Some(0.0));
        assert_eq!(patch.columns(), vec!["full_name", "latitude"]);
    }

    #[test]
    fn test_normalized_keeps_whitespace_values() {
        let patch = ProfilePatch {
            address: Some(" ".into()),
            ..ProfilePatch::default()
        }
        .normalized();

        assert_eq!(patch.address.as_deref(), Some(" "));
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_only_empty_values_is_empty() {
        let patch = ProfilePatch {
            full_name: Some(String::new()),
            email: Some(String::new()),
            birth_date: Some(NaiveDateTime::default()),
            ..ProfilePatch::default()
        }
        .normalized();
        assert!(patch.is_empty());
    }

    #[test]
    fn test_updated_by_alone_is_empty() {
        let patch = ProfilePatch {
            updated_by: Some("admin".into()),
            ..ProfilePatch::default()
        };
        assert!(patch.is_empty());
    }

    #[test]
    fn test_profile_image_url_patch() {
        let patch = ProfilePatch::profile_image_url("https://cdn/images/a.png".into());
        assert!(!patch.is_empty());
        assert_eq!(patch.columns(), vec!["profile_image_url"]);
    }
}
