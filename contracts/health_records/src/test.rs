#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::arithmetic_side_effects
)]

extern crate std;

use super::*;
use common::{Classified, ErrorCategory};
use soroban_sdk::testutils::{Address as _, Ledger};

fn setup() -> (Env, HealthRecordsContractClient<'static>, Address) {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(1_700_000_000);

    let contract_id = env.register(HealthRecordsContract, ());
    let client = HealthRecordsContractClient::new(&env, &contract_id);

    let admin = Address::generate(&env);
    client.initialize(&admin);

    (env, client, admin)
}

fn s(env: &Env, v: &str) -> String {
    String::from_str(env, v)
}

fn vitals(env: &Env) -> Vitals {
    Vitals {
        age: 42,
        gender: s(env, "female"),
        bmi_x10: 247,
        blood_pressure_systolic: 120,
        blood_pressure_diastolic: 80,
        heart_rate: 68,
        temperature_x10: 368,
        oxygen_saturation: 98,
    }
}

fn create(env: &Env, client: &HealthRecordsContractClient, owner: &Address, score: Option<u32>) -> u64 {
    let mut metadata = Map::new(env);
    metadata.set(s(env, "type"), s(env, "blood-panel"));
    client.create_record(
        owner,
        &s(env, "QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG"),
        &s(env, "enc-key-1"),
        &metadata,
        &Some(vitals(env)),
        &score,
    )
}

#[test]
fn test_initialize_twice_fails() {
    let (env, client, admin) = setup();
    assert!(client.is_initialized());
    assert_eq!(client.get_admin_tier(&admin), Some(AdminTier::SuperAdmin));

    let other = Address::generate(&env);
    let res = client.try_initialize(&other);
    assert_eq!(res, Err(Ok(ContractError::AlreadyInitialized)));
}

#[test]
fn test_create_and_get_record() {
    let (env, client, _) = setup();
    let owner = Address::generate(&env);

    let id = create(&env, &client, &owner, Some(82));
    assert_eq!(id, 1);

    let record = client.get_record(&owner, &id);
    assert_eq!(record.owner, owner);
    assert_eq!(record.health_score, Some(82));
    assert_eq!(record.vitals, Some(vitals(&env)));
    assert_eq!(record.metadata.get(s(&env, "type")), Some(s(&env, "blood-panel")));
    assert_eq!(record.created_at, 1_700_000_000);
    assert!(record.nft.is_none());
}

#[test]
fn test_non_owner_cannot_read_or_modify() {
    let (env, client, admin) = setup();
    let owner = Address::generate(&env);
    let stranger = Address::generate(&env);
    let id = create(&env, &client, &owner, None);

    match client.try_get_record(&stranger, &id) {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        other => panic!("expected Unauthorized, got {:?}", other),
    }
    // Admin tier does not grant access to personal records.
    assert_eq!(
        client.try_get_record(&admin, &id),
        Err(Ok(ContractError::Unauthorized))
    );
    assert_eq!(
        client.try_delete_record(&stranger, &id),
        Err(Ok(ContractError::Unauthorized))
    );
}

#[test]
fn test_validation_failures() {
    let (env, client, _) = setup();
    let owner = Address::generate(&env);

    let res = client.try_create_record(
        &owner,
        &s(&env, ""),
        &s(&env, "key"),
        &Map::new(&env),
        &None,
        &None,
    );
    assert_eq!(res, Err(Ok(ContractError::InvalidInput)));

    let res = client.try_create_record(
        &owner,
        &s(&env, "Qm1"),
        &s(&env, "key"),
        &Map::new(&env),
        &None,
        &Some(101),
    );
    assert_eq!(res, Err(Ok(ContractError::InvalidHealthScore)));

    let mut bad = vitals(&env);
    bad.oxygen_saturation = 120;
    let res = client.try_create_record(
        &owner,
        &s(&env, "Qm1"),
        &s(&env, "key"),
        &Map::new(&env),
        &Some(bad),
        &None,
    );
    assert_eq!(res, Err(Ok(ContractError::InvalidVitals)));
    assert_eq!(ContractError::InvalidVitals.category(), ErrorCategory::Validation);
}

#[test]
fn test_update_replaces_content() {
    let (env, client, _) = setup();
    let owner = Address::generate(&env);
    let id = create(&env, &client, &owner, Some(50));

    env.ledger().set_timestamp(1_700_000_100);
    let updated = client.update_record(
        &owner,
        &id,
        &s(&env, "QmNew"),
        &s(&env, "enc-key-2"),
        &Map::new(&env),
        &None,
        &Some(75),
    );
    assert_eq!(updated.ipfs_hash, s(&env, "QmNew"));
    assert_eq!(updated.health_score, Some(75));
    assert_eq!(updated.vitals, None);
    assert_eq!(updated.updated_at, 1_700_000_100);
    assert_eq!(updated.created_at, 1_700_000_000);
}

#[test]
fn test_list_is_newest_first_and_hides_deleted() {
    let (env, client, _) = setup();
    let owner = Address::generate(&env);
    let first = create(&env, &client, &owner, Some(10));
    let second = create(&env, &client, &owner, Some(20));
    let third = create(&env, &client, &owner, Some(30));

    client.delete_record(&owner, &second);

    let records = client.list_records(&owner);
    assert_eq!(records.len(), 2);
    assert_eq!(records.get(0).unwrap().id, third);
    assert_eq!(records.get(1).unwrap().id, first);

    assert_eq!(
        client.try_get_record(&owner, &second),
        Err(Ok(ContractError::RecordNotFound))
    );
    assert_eq!(client.record_owner(&second), None);
    assert_eq!(client.record_owner(&first), Some(owner));
}

#[test]
fn test_latest_health_score() {
    let (env, client, _) = setup();
    let owner = Address::generate(&env);
    assert_eq!(client.latest_health_score(&owner), 0);

    create(&env, &client, &owner, Some(60));
    let newest = create(&env, &client, &owner, Some(85));
    assert_eq!(client.latest_health_score(&owner), 85);

    client.delete_record(&owner, &newest);
    assert_eq!(client.latest_health_score(&owner), 60);

    create(&env, &client, &owner, None);
    assert_eq!(client.latest_health_score(&owner), 0);
}

#[test]
fn test_mint_nft_once_and_burn_on_delete() {
    let (env, client, _) = setup();
    let owner = Address::generate(&env);
    let id = create(&env, &client, &owner, Some(70));

    let token = client.mint_record_nft(&owner, &id);
    assert_eq!(token.token_id, 1);
    assert_eq!(token.ipfs_hash.len(), 71);
    assert_eq!(client.get_record(&owner, &id).nft, Some(token.clone()));

    assert_eq!(
        client.try_mint_record_nft(&owner, &id),
        Err(Ok(ContractError::AlreadyMinted))
    );

    client.delete_record(&owner, &id);
    assert!(client.get_nft(&token.token_id).unwrap().burned);
}

#[test]
fn test_mint_is_rate_limited() {
    let (env, client, admin) = setup();
    let owner = Address::generate(&env);
    client.set_rate_limit_config(&admin, &2, &60);

    let a = create(&env, &client, &owner, None);
    let b = create(&env, &client, &owner, None);
    let c = create(&env, &client, &owner, None);
    client.mint_record_nft(&owner, &a);
    client.mint_record_nft(&owner, &b);

    let err = client.try_mint_record_nft(&owner, &c);
    assert_eq!(err, Err(Ok(ContractError::RateLimitExceeded)));
    assert!(ContractError::RateLimitExceeded.retryable());

    env.ledger().set_timestamp(1_700_000_060);
    client.mint_record_nft(&owner, &c);
}

#[test]
fn test_rate_limit_config_requires_contract_admin() {
    let (env, client, admin) = setup();
    let ops = Address::generate(&env);
    client.promote_admin(&admin, &ops, &AdminTier::OperatorAdmin);

    assert_eq!(
        client.try_set_rate_limit_config(&ops, &5, &60),
        Err(Ok(ContractError::Unauthorized))
    );
    assert_eq!(client.get_rate_limit_config(), RateLimiterConfig::new(10, 60));

    client.promote_admin(&admin, &ops, &AdminTier::ContractAdmin);
    client.set_rate_limit_config(&ops, &5, &60);
    assert_eq!(client.get_rate_limit_config(), RateLimiterConfig::new(5, 60));

    client.demote_admin(&admin, &ops);
    assert_eq!(client.get_admin_tier(&ops), None);
}

#[test]
fn test_device_data() {
    let (env, client, _) = setup();
    let owner = Address::generate(&env);
    let mut data = Map::new(&env);
    data.set(s(&env, "heart_rate"), s(&env, "72"));

    let first = client.record_device_data(
        &owner,
        &s(&env, "watch-01"),
        &s(&env, "smartwatch"),
        &data,
        &1_699_999_000,
    );
    let second = client.record_device_data(
        &owner,
        &s(&env, "cuff-01"),
        &s(&env, "blood_pressure_monitor"),
        &data,
        &1_699_999_500,
    );

    let readings = client.list_device_data(&owner);
    assert_eq!(readings.len(), 2);
    assert_eq!(readings.get(0).unwrap().id, second);
    assert_eq!(readings.get(1).unwrap().id, first);

    assert_eq!(
        client.try_record_device_data(
            &owner,
            &s(&env, "watch-01"),
            &s(&env, "smartwatch"),
            &Map::new(&env),
            &0,
        ),
        Err(Ok(ContractError::InvalidInput))
    );
}
