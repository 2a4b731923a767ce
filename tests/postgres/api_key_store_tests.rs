//! Key lookup and last-use tracking against a real `api_keys` table.

use crate::postgres::helpers::{CleanupGuard, setup_key_store, test_runtime};
use chrono::{DateTime, TimeZone, Utc};
use docktrine::access::{
    domain::{ApiKeyRecord, ApiKeySecret},
    ports::{ApiKeyStore, ApiKeyStoreError},
};
use mockable::DefaultClock;
use pg_embedded_setup_unpriv::TestCluster;
use pg_embedded_setup_unpriv::test_support::shared_test_cluster;
use rstest::rstest;

fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 10, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

#[rstest]
fn touch_last_used_never_moves_backwards(shared_test_cluster: &'static TestCluster) {
    let db_name = format!("test_touch_monotonic_{}", uuid::Uuid::new_v4());
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let store = setup_key_store(shared_test_cluster, &db_name).expect("store setup");
    let rt = test_runtime();

    let secret = ApiKeySecret::generate();
    let record = ApiKeyRecord::new(&secret, "ci", &DefaultClock);
    rt.block_on(store.create(&record)).expect("create should succeed");

    for used_at in [at(12), at(9), at(12), at(14), at(11)] {
        rt.block_on(store.touch_last_used(record.digest(), used_at))
            .expect("touch should succeed");
    }

    let stored = rt
        .block_on(store.find_by_digest(record.digest()))
        .expect("query ok")
        .expect("record should exist");
    assert_eq!(stored.last_used_at(), Some(at(14)));
}

#[rstest]
fn touch_of_unknown_digest_is_a_no_op(shared_test_cluster: &'static TestCluster) {
    let db_name = format!("test_touch_unknown_{}", uuid::Uuid::new_v4());
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let store = setup_key_store(shared_test_cluster, &db_name).expect("store setup");
    let rt = test_runtime();

    let stranger = ApiKeySecret::generate();
    rt.block_on(store.touch_last_used(&stranger.digest(), at(9)))
        .expect("touch should succeed");

    assert_eq!(rt.block_on(store.count()).expect("count ok"), 0);
}

#[rstest]
fn duplicate_digest_is_rejected(shared_test_cluster: &'static TestCluster) {
    let db_name = format!("test_duplicate_digest_{}", uuid::Uuid::new_v4());
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let store = setup_key_store(shared_test_cluster, &db_name).expect("store setup");
    let rt = test_runtime();

    let secret = ApiKeySecret::generate();
    let first = ApiKeyRecord::new(&secret, "ci", &DefaultClock);
    let second = ApiKeyRecord::new(&secret, "ops", &DefaultClock);
    rt.block_on(store.create(&first)).expect("create should succeed");

    let result = rt.block_on(store.create(&second));

    assert!(matches!(result, Err(ApiKeyStoreError::DuplicateKey(id)) if id == second.id()));
    assert_eq!(rt.block_on(store.count()).expect("count ok"), 1);
}
