//! Key issuance and authentication through the access gate.

use super::helpers::{Gate, gate};
use docktrine::access::{domain::ApiKeySecret, services::AccessError};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn bootstrap_key_authenticates(gate: Gate) {
    let issued = gate
        .bootstrap()
        .await
        .expect("bootstrap should succeed")
        .expect("empty store should issue a key");

    let record = gate
        .authenticate(Some(issued.secret().expose()))
        .await
        .expect("bootstrap key should authenticate");

    assert_eq!(record.id(), issued.record().id());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn every_provisioned_key_authenticates_independently(gate: Gate) {
    let first = gate.provision("ci").await.expect("key should provision");
    let second = gate.provision("ops").await.expect("key should provision");

    let first_record = gate
        .authenticate(Some(first.secret().expose()))
        .await
        .expect("first key should authenticate");
    let second_record = gate
        .authenticate(Some(second.secret().expose()))
        .await
        .expect("second key should authenticate");

    assert_eq!(first_record.description(), "ci");
    assert_eq!(second_record.description(), "ops");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn generated_but_unstored_key_is_rejected(gate: Gate) {
    gate.provision("ci").await.expect("key should provision");
    let stranger = ApiKeySecret::generate();

    let result = gate.authenticate(Some(stranger.expose())).await;

    assert!(matches!(result, Err(AccessError::Unauthenticated)));
}
