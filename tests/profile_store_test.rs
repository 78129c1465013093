//! Behavior every `ProfileStore` backend must share, checked against SQLite and memory.

use chrono::NaiveDateTime;

use tenant_profiles::env_config::DatabaseConfig;
use tenant_profiles::error::ConstraintViolationType;
use tenant_profiles::profile::{
    DieselProfileStore, MemoryProfileStore, Profile, ProfileBuilder, ProfileKey, ProfilePatch,
    ProfileStore, ProfileStoreError,
};
use tenant_profiles::store::sqlite::create_sqlite_connection_pool;

fn sqlite_store() -> Box<dyn ProfileStore> {
    let pool = create_sqlite_connection_pool(":memory:", &DatabaseConfig::default())
        .expect("Failed to create in-memory SQLite pool");
    Box::new(DieselProfileStore::new(pool))
}

fn memory_store() -> Box<dyn ProfileStore> {
    Box::new(MemoryProfileStore::new())
}

fn backends() -> Vec<(&'static str, Box<dyn ProfileStore>)> {
    vec![("sqlite", sqlite_store()), ("memory", memory_store())]
}

fn profile(tenant_id: &str, profile_id: &str, email: &str, mobile: &str) -> Profile {
    ProfileBuilder::new()
        .with_tenant_id(tenant_id.into())
        .with_profile_id(profile_id.into())
        .with_full_name(format!("Profile {}", profile_id))
        .with_email(email.into())
        .with_mobile(mobile.into())
        .build()
        .expect("Failed to build profile")
}

fn assert_unique_violation(name: &str, result: Result<String, ProfileStoreError>) {
    match result {
        Err(ProfileStoreError::ConstraintViolation(err)) => {
            assert_eq!(
                err.violation_type(),
                &ConstraintViolationType::Unique,
                "{}",
                name
            )
        }
        other => panic!("{}: expected a unique violation, got {:?}", name, other),
    }
}

#[test]
fn distinct_profiles_are_created() {
    for (name, store) in backends() {
        for i in 0..5 {
            let id = store
                .create_profile(profile(
                    "default",
                    &format!("p{}", i),
                    &format!("user{}@x.com", i),
                    &format!("90000{}", i),
                ))
                .unwrap_or_else(|err| panic!("{}: {}", name, err));
            assert_eq!(id, format!("p{}", i), "{}", name);
        }
        // the same profile id may exist in another tenant
        store
            .create_profile(profile("other", "p0", "other@x.com", "800000"))
            .unwrap_or_else(|err| panic!("{}: {}", name, err));
    }
}

#[test]
fn duplicate_email_fails_in_any_tenant() {
    for (name, store) in backends() {
        let id = store
            .create_profile(profile("default", "1", "a@x.com", "111"))
            .unwrap();
        assert!(!id.is_empty());

        assert_unique_violation(
            name,
            store.create_profile(profile("default", "2", "a@x.com", "222")),
        );
        assert_unique_violation(
            name,
            store.create_profile(profile("other", "3", "a@x.com", "333")),
        );
        assert_unique_violation(
            name,
            store.create_profile(profile("other", "4", "b@x.com", "111")),
        );
    }
}

#[test]
fn search_never_leaks_other_tenants() {
    for (name, store) in backends() {
        store
            .create_profile(profile("t1", "1", "one@x.com", "1"))
            .unwrap();
        store
            .create_profile(profile("t2", "2", "two@x.com", "2"))
            .unwrap();
        store
            .create_profile(profile("t2", "3", "three@x.com", "3"))
            .unwrap();

        let found = store.search_profiles("", 0, 0, "", "t1").unwrap();
        assert_eq!(found.len(), 1, "{}", name);
        assert!(found.iter().all(|p| p.tenant_id() == "t1"), "{}", name);

        let found = store
            .search_profiles("email = 'two@x.com'", 0, 0, "", "t1")
            .unwrap();
        assert!(found.is_empty(), "{}", name);
    }
}

#[test]
fn sql_predicate_cannot_widen_the_tenant_scope() {
    let store = sqlite_store();
    store
        .create_profile(profile("t1", "1", "one@x.com", "1"))
        .unwrap();
    store
        .create_profile(profile("t2", "2", "two@x.com", "2"))
        .unwrap();

    let found = store
        .search_profiles("1 = 1 OR tenant_id = 't2'", 0, 0, "", "t1")
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].tenant_id(), "t1");

    let found = store
        .search_profiles(
            "tenant_id IN (SELECT tenant_id FROM profiles)",
            0,
            0,
            "tenant_id",
            "t1",
        )
        .unwrap();
    assert_eq!(found.len(), 1);
    assert!(found.iter().all(|p| p.tenant_id() == "t1"));
}

#[test]
fn search_pages_and_sorts() {
    for (name, store) in backends() {
        for (id, full_name) in [("1", "Carol"), ("2", "Alice"), ("3", "Bob")] {
            store
                .create_profile(
                    ProfileBuilder::new()
                        .with_tenant_id("default".into())
                        .with_profile_id(id.into())
                        .with_full_name(full_name.into())
                        .with_email(format!("{}@x.com", id))
                        .with_mobile(id.into())
                        .build()
                        .unwrap(),
                )
                .unwrap();
        }

        let names = |limit, offset, sort_by| {
            store
                .search_profiles("", limit, offset, sort_by, "default")
                .unwrap()
                .iter()
                .map(|p| p.full_name().to_string())
                .collect::<Vec<_>>()
        };

        assert_eq!(names(0, 0, "full_name"), vec!["Alice", "Bob", "Carol"], "{}", name);
        assert_eq!(names(0, 0, "full_name DESC"), vec!["Carol", "Bob", "Alice"], "{}", name);
        assert_eq!(names(2, 0, "full_name"), vec!["Alice", "Bob"], "{}", name);
        assert_eq!(names(2, 2, "full_name"), vec!["Carol"], "{}", name);
        assert!(names(0, 5, "full_name").is_empty(), "{}", name);
    }
}

#[test]
fn invalid_query_is_reported() {
    for (name, store) in backends() {
        match store.search_profiles("no_such_column = 'x'", 0, 0, "", "default") {
            Err(ProfileStoreError::InvalidQuery(_)) => {}
            other => panic!("{}: expected InvalidQuery, got {:?}", name, other),
        }
    }
}

#[test]
fn delete_returns_true_exactly_once() {
    for (name, store) in backends() {
        store
            .create_profile(profile("default", "101", "a@x.com", "111"))
            .unwrap();

        assert!(!store.delete_profile("101", "other").unwrap(), "{}", name);
        assert!(store.delete_profile("101", "default").unwrap(), "{}", name);
        assert!(!store.delete_profile("101", "default").unwrap(), "{}", name);
        assert!(
            store.search_profiles("", 0, 0, "", "default").unwrap().is_empty(),
            "{}",
            name
        );
    }
}

#[test]
fn delete_missing_profile_is_false() {
    for (name, store) in backends() {
        assert!(
            !store.delete_profile("missing-id", "default").unwrap(),
            "{}",
            name
        );
    }
}

#[test]
fn blank_keys_are_invalid_arguments() {
    for (name, store) in backends() {
        assert!(
            matches!(
                store.delete_profile("", "default"),
                Err(ProfileStoreError::InvalidArgument(_))
            ),
            "{}",
            name
        );
        assert!(
            matches!(
                store.update_profile(
                    &ProfileKey::new("", "101"),
                    ProfilePatch {
                        full_name: Some("x".into()),
                        ..ProfilePatch::default()
                    }
                ),
                Err(ProfileStoreError::InvalidArgument(_))
            ),
            "{}",
            name
        );
    }
}

#[test]
fn update_with_only_empty_values_is_a_noop() {
    for (name, store) in backends() {
        let original = profile("default", "101", "a@x.com", "111");
        store.create_profile(original.clone()).unwrap();

        let patch = ProfilePatch {
            full_name: Some(String::new()),
            gender: Some("".into()),
            email: Some(String::new()),
            birth_date: Some(NaiveDateTime::default()),
            ..ProfilePatch::default()
        };
        assert!(
            !store
                .update_profile(&ProfileKey::new("default", "101"), patch)
                .unwrap(),
            "{}",
            name
        );

        let found = store
            .search_profiles("email = 'a@x.com'", 0, 0, "", "default")
            .unwrap();
        assert_eq!(found, vec![original], "{}", name);
    }
}

#[test]
fn update_with_whitespace_value_is_applied() {
    for (name, store) in backends() {
        store
            .create_profile(profile("default", "101", "a@x.com", "111"))
            .unwrap();

        let patch = ProfilePatch {
            address: Some(" ".into()),
            ..ProfilePatch::default()
        };
        assert!(
            store
                .update_profile(&ProfileKey::new("default", "101"), patch)
                .unwrap(),
            "{}",
            name
        );

        let found = store
            .search_profiles("profile_id = '101'", 0, 0, "", "default")
            .unwrap();
        assert_eq!(found[0].address(), Some(" "), "{}", name);
    }
}

#[test]
fn quoted_literals_compare_as_text() {
    for (name, store) in backends() {
        store
            .create_profile(profile("default", "1", "a@x.com", "111"))
            .unwrap();

        for query in ["mobile = '0111'", "profile_id = '1.0'", "mobile = 'NaN'"] {
            let found = store.search_profiles(query, 0, 0, "", "default").unwrap();
            assert!(found.is_empty(), "{}: {} matched {:?}", name, query, found);
        }

        let found = store
            .search_profiles("mobile = '111' AND profile_id = '1'", 0, 0, "", "default")
            .unwrap();
        assert_eq!(found.len(), 1, "{}", name);
    }
}

#[test]
fn quoted_literals_keep_their_spacing() {
    for (name, store) in backends() {
        store
            .create_profile(
                ProfileBuilder::new()
                    .with_tenant_id("default".into())
                    .with_profile_id("1".into())
                    .with_full_name("Mary  Ann".into())
                    .with_email("mary@x.com".into())
                    .with_mobile("111".into())
                    .build()
                    .expect("Failed to build profile"),
            )
            .unwrap();

        let found = store
            .search_profiles("full_name = 'Mary  Ann'", 0, 0, "", "default")
            .unwrap();
        assert_eq!(found.len(), 1, "{}", name);

        let found = store
            .search_profiles("full_name = 'Mary Ann'", 0, 0, "", "default")
            .unwrap();
        assert!(found.is_empty(), "{}", name);
    }
}

#[test]
fn update_renames_profile() {
    for (name, store) in backends() {
        store
            .create_profile(profile("default", "101", "a@x.com", "111"))
            .unwrap();

        let patch = ProfilePatch {
            full_name: Some("New Name".into()),
            ..ProfilePatch::default()
        };
        assert!(
            store
                .update_profile(&ProfileKey::new("default", "101"), patch)
                .unwrap(),
            "{}",
            name
        );

        let found = store
            .search_profiles("profile_id = '101'", 0, 0, "", "default")
            .unwrap();
        assert_eq!(found.len(), 1, "{}", name);
        assert_eq!(found[0].full_name(), "New Name", "{}", name);
        assert_eq!(found[0].email(), "a@x.com", "{}", name);
    }
}

#[test]
fn update_of_missing_profile_is_false() {
    for (name, store) in backends() {
        let patch = ProfilePatch {
            full_name: Some("New Name".into()),
            ..ProfilePatch::default()
        };
        assert!(
            !store
                .update_profile(&ProfileKey::new("default", "missing-id"), patch)
                .unwrap(),
            "{}",
            name
        );
    }
}

#[test]
fn update_into_taken_email_is_a_constraint_violation() {
    for (name, store) in backends() {
        store
            .create_profile(profile("default", "1", "a@x.com", "111"))
            .unwrap();
        store
            .create_profile(profile("other", "2", "b@x.com", "222"))
            .unwrap();

        let patch = ProfilePatch {
            email: Some("b@x.com".into()),
            ..ProfilePatch::default()
        };
        assert!(
            matches!(
                store.update_profile(&ProfileKey::new("default", "1"), patch),
                Err(ProfileStoreError::ConstraintViolation(_))
            ),
            "{}",
            name
        );
    }
}

#[test]
fn created_profile_round_trips() {
    for (name, store) in backends() {
        let original = ProfileBuilder::new()
            .with_tenant_id("default".into())
            .with_profile_id("101".into())
            .with_full_name("Nimesh".into())
            .with_gender("M".into())
            .with_email("nimesh@example.com".into())
            .with_mobile("8888800000".into())
            .with_birth_date(
                NaiveDateTime::parse_from_str("1990-04-01 00:00:00", "%Y-%m-%d %H:%M:%S")
                    .unwrap(),
            )
            .with_city_id("BLR".into())
            .with_country_id("IN".into())
            .with_address("MG Road".into())
            .with_latitude(12.9716)
            .with_longitude(77.5946)
            .build()
            .unwrap();
        store.create_profile(original.clone()).unwrap();

        let found = store
            .search_profiles("email = 'nimesh@example.com'", 0, 0, "", "default")
            .unwrap();
        assert_eq!(found, vec![original], "{}", name);
    }
}

#[test]
fn upload_profile_image_is_not_implemented() {
    for (name, store) in backends() {
        assert!(
            matches!(
                store.upload_profile_image("101", b"image"),
                Err(ProfileStoreError::NotImplemented(_))
            ),
            "{}",
            name
        );
    }
}
