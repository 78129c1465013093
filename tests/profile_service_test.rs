use std::sync::{Arc, Mutex};

use tenant_profiles::database::{create_connection_pool, create_store_factory, ConnectionUri};
use tenant_profiles::env_config::DatabaseConfig;
use tenant_profiles::profile::request::{
    generate_profile_id, resolve_tenant, CreateProfileRequest, UpdateProfileRequest,
};
use tenant_profiles::profile::{
    EventOutcome, ProfileEvent, ProfileEventSink, ProfileKey, ProfileOperation, ProfileService,
    ProfileStoreError,
};

#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<ProfileEvent>>,
}

impl RecordingSink {
    fn outcomes(&self) -> Vec<(ProfileOperation, EventOutcome)> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|event| (event.operation, event.outcome.clone()))
            .collect()
    }
}

impl ProfileEventSink for RecordingSink {
    fn emit(&self, event: &ProfileEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

fn service() -> (ProfileService, Arc<RecordingSink>) {
    let pool = create_connection_pool(&ConnectionUri::Memory, &DatabaseConfig::default())
        .expect("Failed to create connection pool");
    let store = create_store_factory(&pool)
        .expect("Failed to create store factory")
        .get_profile_store();
    let sink = Arc::new(RecordingSink::default());
    (ProfileService::new(store, sink.clone()), sink)
}

fn create_request(email: &str, mobile: &str) -> CreateProfileRequest {
    CreateProfileRequest {
        full_name: "Nimesh".into(),
        email: email.into(),
        mobile: mobile.into(),
        ..CreateProfileRequest::default()
    }
}

#[test]
fn request_flow_uses_default_tenant_and_generated_id() {
    let (service, _) = service();
    let tenant = resolve_tenant(None, "default");

    let profile = create_request("a@x.com", "111")
        .into_profile(&tenant, generate_profile_id())
        .unwrap();
    let profile_id = service.create(profile).unwrap();
    assert!(!profile_id.is_empty());

    let patch = UpdateProfileRequest {
        full_name: "New Name".into(),
        ..UpdateProfileRequest::default()
    }
    .into_patch();
    assert!(service
        .update(&ProfileKey::new(&tenant, &profile_id), patch)
        .unwrap());

    let found = service.search("", 0, 0, "", "default").unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].profile_id(), profile_id);
    assert_eq!(found[0].full_name(), "New Name");
}

#[test]
fn store_errors_pass_through_and_are_reported() {
    let (service, sink) = service();
    let first = create_request("a@x.com", "111")
        .into_profile("default", generate_profile_id())
        .unwrap();
    let second = create_request("a@x.com", "222")
        .into_profile("default", generate_profile_id())
        .unwrap();

    service.create(first).unwrap();
    let err = service.create(second).unwrap_err();
    assert!(matches!(err, ProfileStoreError::ConstraintViolation(_)));

    let outcomes = sink.outcomes();
    assert_eq!(outcomes.len(), 4);
    assert_eq!(outcomes[0], (ProfileOperation::Create, EventOutcome::Attempted));
    assert_eq!(outcomes[1], (ProfileOperation::Create, EventOutcome::Succeeded));
    assert_eq!(outcomes[2], (ProfileOperation::Create, EventOutcome::Attempted));
    assert!(matches!(
        outcomes[3],
        (ProfileOperation::Create, EventOutcome::Failed(_))
    ));
}

#[test]
fn delete_and_search_events_carry_tenant() {
    let (service, sink) = service();
    assert!(!service.delete("missing-id", "acme").unwrap());
    assert!(service.search("", 0, 0, "", "acme").unwrap().is_empty());

    let events = sink.events.lock().unwrap();
    assert_eq!(events.len(), 4);
    assert!(events.iter().all(|event| event.tenant_id == "acme"));
    assert_eq!(events[1].profile_id.as_deref(), Some("missing-id"));
    assert_eq!(events[3].profile_id, None);
}
