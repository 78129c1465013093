//! The orchestration layer callers use to reach a [`ProfileStore`].

use std::sync::Arc;

use super::events::{EventOutcome, LogEventSink, ProfileEvent, ProfileEventSink, ProfileOperation};
use super::store::{Profile, ProfileKey, ProfilePatch, ProfileStore, ProfileStoreError};

/// Forwards each call to the store unchanged and reports it to the event sink.
///
/// There is no validation, retry or error translation here: whatever the store returns is what
/// the caller gets.
#[derive(Clone)]
pub struct ProfileService {
    store: Box<dyn ProfileStore>,
    events: Arc<dyn ProfileEventSink>,
}

impl ProfileService {
    pub fn new(store: Box<dyn ProfileStore>, events: Arc<dyn ProfileEventSink>) -> Self {
        Self { store, events }
    }

    /// Creates a service that reports events through the `log` facade
    pub fn with_log_events(store: Box<dyn ProfileStore>) -> Self {
        Self::new(store, Arc::new(LogEventSink))
    }

    pub fn create(&self, profile: Profile) -> Result<String, ProfileStoreError> {
        let event = ProfileEvent::new(
            ProfileOperation::Create,
            profile.tenant_id(),
            Some(profile.profile_id()),
        );
        self.observe(event, || self.store.create_profile(profile))
    }

    pub fn delete(&self, profile_id: &str, tenant_id: &str) -> Result<bool, ProfileStoreError> {
        let event = ProfileEvent::new(ProfileOperation::Delete, tenant_id, Some(profile_id));
        self.observe(event, || self.store.delete_profile(profile_id, tenant_id))
    }

    pub fn search(
        &self,
        query: &str,
        limit: u32,
        offset: u32,
        sort_by: &str,
        tenant_id: &str,
    ) -> Result<Vec<Profile>, ProfileStoreError> {
        let event = ProfileEvent::new(ProfileOperation::Search, tenant_id, None);
        self.observe(event, || {
            self.store
                .search_profiles(query, limit, offset, sort_by, tenant_id)
        })
    }

    pub fn update(
        &self,
        filter: &ProfileKey,
        patch: ProfilePatch,
    ) -> Result<bool, ProfileStoreError> {
        let event = ProfileEvent::new(
            ProfileOperation::Update,
            &filter.tenant_id,
            Some(&filter.profile_id),
        );
        self.observe(event, || self.store.update_profile(filter, patch))
    }

    pub fn upload_profile_image(
        &self,
        profile_id: &str,
        tenant_id: &str,
        image: &[u8],
    ) -> Result<bool, ProfileStoreError> {
        let event = ProfileEvent::new(ProfileOperation::UploadImage, tenant_id, Some(profile_id));
        self.observe(event, || self.store.upload_profile_image(profile_id, image))
    }

    fn observe<T, F>(&self, event: ProfileEvent, f: F) -> Result<T, ProfileStoreError>
    where
        F: FnOnce() -> Result<T, ProfileStoreError>,
    {
        self.events.emit(&event);
        let result = f();
        match &result {
            Ok(_) => self.events.emit(&event.with_outcome(EventOutcome::Succeeded)),
            Err(err) => self
                .events
                .emit(&event.with_outcome(EventOutcome::Failed(err.to_string()))),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use crate::modules::profile::store::memory::MemoryProfileStore;
    use crate::modules::profile::store::ProfileBuilder;

    #[derive(Default)]
    struct RecordingSink {
        events: Mutex<Vec<ProfileEvent>>,
    }

    impl ProfileEventSink for RecordingSink {
        fn emit(&self, event: &ProfileEvent) {
            self.events.lock().unwrap().push(event.clone());
        }
    }

    fn service() -> (ProfileService, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::default());
        let service = ProfileService::new(Box::new(MemoryProfileStore::new()), sink.clone());
        (service, sink)
    }

    #[test]
    fn test_create_emits_attempt_and_success() {
        let (service, sink) = service();
        let profile = ProfileBuilder::new()
            .with_tenant_id("default".into())
            .with_profile_id("101".into())
            .with_full_name("Nimesh".into())
            .with_email("nimesh@example.com".into())
            .with_mobile("8888800000".into())
            .build()
            .unwrap();

        assert_eq!(service.create(profile).unwrap(), "101");

        let events = sink.events.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].outcome, EventOutcome::Attempted);
        assert_eq!(events[1].outcome, EventOutcome::Succeeded);
        assert_eq!(events[1].operation, ProfileOperation::Create);
        assert_eq!(events[1].profile_id.as_deref(), Some("101"));
    }

    #[test]
    fn test_upload_image_error_passes_through() {
        let (service, sink) = service();
        let err = service
            .upload_profile_image("101", "default", b"png")
            .unwrap_err();
        assert!(matches!(err, ProfileStoreError::NotImplemented(_)));

        let events = sink.events.lock().unwrap();
        assert_eq!(
            events[1].outcome,
            EventOutcome::Failed("upload_profile_image is not implemented".into())
        );
    }
}
