#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::arithmetic_side_effects
)]

extern crate std;

use super::*;
use common::Classified;
use soroban_sdk::testutils::{Address as _, Ledger};

const NOW: u64 = 1_700_000_000;
const DAY: u64 = 86_400;

fn setup() -> (Env, HealthTokenContractClient<'static>, Address) {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(NOW);

    let contract_id = env.register(HealthTokenContract, ());
    let client = HealthTokenContractClient::new(&env, &contract_id);

    let admin = Address::generate(&env);
    client.initialize(&admin);

    (env, client, admin)
}

fn s(env: &Env, v: &str) -> String {
    String::from_str(env, v)
}

fn create(env: &Env, client: &HealthTokenContractClient, owner: &Address, symbol: &str) -> u64 {
    client.create_token(
        owner,
        &s(env, "Wellness Token"),
        &s(env, symbol),
        &s(env, "stellar-testnet"),
        &Map::new(env),
    )
}

/// A token holding `balance` liquid units.
fn funded(
    env: &Env,
    client: &HealthTokenContractClient,
    admin: &Address,
    owner: &Address,
    balance: i128,
) -> u64 {
    let id = create(env, client, owner, "HLT");
    client.mint(admin, &id, &balance);
    id
}

// ── Initialisation ──────────────────────────────────────────────────────────

#[test]
fn test_initialize_once() {
    let (env, client, admin) = setup();
    assert!(client.is_initialized());
    assert_eq!(client.get_admin_tier(&admin), Some(AdminTier::SuperAdmin));
    assert_eq!(
        client.try_initialize(&Address::generate(&env)),
        Err(Ok(ContractError::AlreadyInitialized))
    );
}

#[test]
fn test_uninitialized_rejects_writes() {
    let env = Env::default();
    env.mock_all_auths();
    let contract_id = env.register(HealthTokenContract, ());
    let client = HealthTokenContractClient::new(&env, &contract_id);
    let owner = Address::generate(&env);
    assert_eq!(
        client.try_create_token(
            &owner,
            &s(&env, "n"),
            &s(&env, "S"),
            &s(&env, "net"),
            &Map::new(&env)
        ),
        Err(Ok(ContractError::NotInitialized))
    );
}

// ── Tokens ──────────────────────────────────────────────────────────────────

#[test]
fn test_create_token_records_deploy_mint() {
    let (env, client, _) = setup();
    let owner = Address::generate(&env);
    let id = create(&env, &client, &owner, "HLT");

    let token = client.get_token(&owner, &id);
    assert_eq!(token.balance, 0);
    assert_eq!(token.status, TokenStatus::Active);
    assert_eq!(token.last_reward_calculation, NOW);

    let txs = client.list_transactions(&owner, &id);
    assert_eq!(txs.len(), 1);
    let tx = txs.get(0).unwrap();
    assert_eq!(tx.kind, TransactionKind::Mint);
    assert_eq!(tx.amount, 0);
    assert_eq!(tx.from, None);
    assert_eq!(tx.to, Some(owner.clone()));
    assert_eq!(tx.status, TransactionStatus::Completed);
    assert_eq!(client.get_transaction(&owner, &tx.id), tx);
}

#[test]
fn test_create_token_validation() {
    let (env, client, _) = setup();
    let owner = Address::generate(&env);
    assert_eq!(
        client.try_create_token(
            &owner,
            &s(&env, "Wellness"),
            &s(&env, "TOOLONGSYMB"),
            &s(&env, "net"),
            &Map::new(&env)
        ),
        Err(Ok(ContractError::InvalidInput))
    );
    assert_eq!(
        client.try_create_token(
            &owner,
            &s(&env, ""),
            &s(&env, "HLT"),
            &s(&env, "net"),
            &Map::new(&env)
        ),
        Err(Ok(ContractError::InvalidInput))
    );
}

#[test]
fn test_token_is_private_to_owner() {
    let (env, client, admin) = setup();
    let owner = Address::generate(&env);
    let id = create(&env, &client, &owner, "HLT");
    let tx_id = client.list_transactions(&owner, &id).get(0).unwrap().id;

    assert_eq!(
        client.try_get_token(&admin, &id),
        Err(Ok(ContractError::Unauthorized))
    );
    assert_eq!(
        client.try_get_transaction(&admin, &tx_id),
        Err(Ok(ContractError::Unauthorized))
    );
    assert_eq!(
        client.try_stake(&admin, &id, &1),
        Err(Ok(ContractError::Unauthorized))
    );
}

#[test]
fn test_update_and_delete_token() {
    let (env, client, _) = setup();
    let owner = Address::generate(&env);
    let first = create(&env, &client, &owner, "HLT");
    let second = create(&env, &client, &owner, "FIT");

    let updated = client.update_token(
        &owner,
        &first,
        &s(&env, "Renamed"),
        &s(&env, "RNM"),
        &TokenStatus::Paused,
    );
    assert_eq!(updated.name, s(&env, "Renamed"));
    assert_eq!(updated.status, TokenStatus::Paused);

    let listed = client.list_tokens(&owner);
    assert_eq!(listed.len(), 2);
    assert_eq!(listed.get(0).unwrap().id, second);

    client.delete_token(&owner, &first);
    assert_eq!(
        client.try_get_token(&owner, &first),
        Err(Ok(ContractError::TokenNotFound))
    );
    assert_eq!(client.list_tokens(&owner).len(), 1);
}

#[test]
fn test_mint_is_admin_only() {
    let (env, client, admin) = setup();
    let owner = Address::generate(&env);
    let id = create(&env, &client, &owner, "HLT");

    assert_eq!(
        client.try_mint(&owner, &id, &100),
        Err(Ok(ContractError::Unauthorized))
    );
    assert_eq!(
        client.try_mint(&admin, &id, &0),
        Err(Ok(ContractError::InvalidInput))
    );
    assert_eq!(client.mint(&admin, &id, &100), 100);
    assert_eq!(client.get_token(&owner, &id).balance, 100);

    let err = client.try_mint(&admin, &id, &i128::MAX).unwrap_err().unwrap();
    assert_eq!(err, ContractError::ArithmeticOverflow);
}

// ── Staking ─────────────────────────────────────────────────────────────────

#[test]
fn test_stake_moves_balance_and_opens_position() {
    let (env, client, admin) = setup();
    let owner = Address::generate(&env);
    let id = funded(&env, &client, &admin, &owner, 1_000);

    let position = client.stake(&owner, &id, &400);
    assert_eq!(position.amount, 400);
    assert_eq!(position.apy_bps, 1_000);
    assert_eq!(position.status, PositionStatus::Active);
    assert_eq!(position.start_date, NOW);

    let token = client.get_token(&owner, &id);
    assert_eq!(token.balance, 600);
    assert_eq!(token.staked_amount, 400);

    let last_tx = client.list_transactions(&owner, &id).get(0).unwrap();
    assert_eq!(last_tx.kind, TransactionKind::Stake);
    assert_eq!(last_tx.amount, 400);
}

#[test]
fn test_stake_and_unstake_limits() {
    let (env, client, admin) = setup();
    let owner = Address::generate(&env);
    let id = funded(&env, &client, &admin, &owner, 100);

    assert_eq!(
        client.try_stake(&owner, &id, &101),
        Err(Ok(ContractError::InsufficientBalance))
    );
    assert_eq!(
        client.try_stake(&owner, &id, &0),
        Err(Ok(ContractError::InvalidInput))
    );

    client.stake(&owner, &id, &60);
    assert_eq!(
        client.try_unstake(&owner, &id, &61),
        Err(Ok(ContractError::InsufficientStakedAmount))
    );
    assert_eq!(
        client.try_unstake(&owner, &id, &-5),
        Err(Ok(ContractError::InvalidInput))
    );
}

#[test]
fn test_stake_unstake_round_trip() {
    let (env, client, admin) = setup();
    let owner = Address::generate(&env);
    let id = funded(&env, &client, &admin, &owner, 500);

    client.stake(&owner, &id, &100);
    assert_eq!(client.unstake(&owner, &id, &100), 500);

    let token = client.get_token(&owner, &id);
    assert_eq!(token.balance, 500);
    assert_eq!(token.staked_amount, 0);
    assert_eq!(token.rewards_earned, 0);
}

#[test]
fn test_unstake_closes_positions_oldest_first() {
    let (env, client, admin) = setup();
    let owner = Address::generate(&env);
    let id = funded(&env, &client, &admin, &owner, 1_000);

    let first = client.stake(&owner, &id, &100);
    env.ledger().set_timestamp(NOW + 60);
    let second = client.stake(&owner, &id, &50);

    env.ledger().set_timestamp(NOW + 120);
    client.unstake(&owner, &id, &120);

    let positions = client.list_staking_positions(&owner, &id);
    assert_eq!(positions.len(), 3);

    let split = positions.get(0).unwrap();
    assert_eq!(split.status, PositionStatus::Closed);
    assert_eq!(split.amount, 20);
    assert_eq!(split.start_date, NOW + 60);
    assert_eq!(split.end_date, Some(NOW + 120));

    let remainder = positions.get(1).unwrap();
    assert_eq!(remainder.id, second.id);
    assert_eq!(remainder.status, PositionStatus::Active);
    assert_eq!(remainder.amount, 30);

    let closed = positions.get(2).unwrap();
    assert_eq!(closed.id, first.id);
    assert_eq!(closed.status, PositionStatus::Closed);
    assert_eq!(closed.end_date, Some(NOW + 120));

    assert_eq!(client.get_token(&owner, &id).staked_amount, 30);
}

// ── Rewards ─────────────────────────────────────────────────────────────────

#[test]
fn test_rewards_accrue_per_whole_day() {
    let (env, client, admin) = setup();
    let owner = Address::generate(&env);
    let id = funded(&env, &client, &admin, &owner, 365_000);
    client.stake(&owner, &id, &365_000);

    env.ledger().set_timestamp(NOW + DAY - 1);
    assert_eq!(client.pending_rewards(&owner, &id), 0);

    // 10 % a year on 365_000 is 100 a day.
    env.ledger().set_timestamp(NOW + 10 * DAY);
    assert_eq!(client.pending_rewards(&owner, &id), 1_000);
    assert_eq!(client.calculate_rewards(&owner, &id), 1_000);

    let token = client.get_token(&owner, &id);
    assert_eq!(token.rewards_earned, 1_000);
    assert_eq!(token.balance, 0);
    assert_eq!(token.staked_amount, 365_000);
    assert_eq!(token.last_reward_calculation, NOW + 10 * DAY);

    assert_eq!(client.calculate_rewards(&owner, &id), 0);
}

#[test]
fn test_stake_leaves_reward_clock_alone() {
    let (env, client, admin) = setup();
    let owner = Address::generate(&env);
    let id = funded(&env, &client, &admin, &owner, 730_000);
    client.stake(&owner, &id, &365_000);

    env.ledger().set_timestamp(NOW + 2 * DAY);
    client.stake(&owner, &id, &365_000);
    let token = client.get_token(&owner, &id);
    assert_eq!(token.rewards_earned, 0);
    assert_eq!(token.last_reward_calculation, NOW);

    // The next calculation covers the whole stake since the last one.
    env.ledger().set_timestamp(NOW + 3 * DAY);
    assert_eq!(client.pending_rewards(&owner, &id), 600);
}

#[test]
fn test_frequent_top_ups_keep_earning() {
    let (env, client, admin) = setup();
    let owner = Address::generate(&env);
    let id = funded(&env, &client, &admin, &owner, 365_010);
    client.stake(&owner, &id, &365_000);

    let hour = 3_600;
    for round in 1..=10u64 {
        env.ledger().set_timestamp(NOW + round * 23 * hour);
        client.stake(&owner, &id, &1);
    }

    // 230 hours is 9 whole days: 365_010 * 0.10 / 365 * 9, truncated.
    assert_eq!(client.calculate_rewards(&owner, &id), 900);
    assert_eq!(client.get_token(&owner, &id).rewards_earned, 900);
}

#[test]
fn test_unstake_forces_reward_calculation() {
    let (env, client, admin) = setup();
    let owner = Address::generate(&env);
    let id = funded(&env, &client, &admin, &owner, 365_000);
    client.stake(&owner, &id, &365_000);

    env.ledger().set_timestamp(NOW + 5 * DAY);
    client.unstake(&owner, &id, &365_000);

    let token = client.get_token(&owner, &id);
    assert_eq!(token.rewards_earned, 500);
    assert_eq!(token.balance, 365_000);
}

#[test]
fn test_rewards_attributed_to_open_positions() {
    let (env, client, admin) = setup();
    let owner = Address::generate(&env);
    let id = funded(&env, &client, &admin, &owner, 365_000);
    client.stake(&owner, &id, &182_500);
    client.stake(&owner, &id, &182_500);

    env.ledger().set_timestamp(NOW + 10 * DAY);
    client.calculate_rewards(&owner, &id);

    for position in client.list_staking_positions(&owner, &id).iter() {
        assert_eq!(position.rewards_earned, 500);
    }
}

#[test]
fn test_claim_rewards() {
    let (env, client, admin) = setup();
    let owner = Address::generate(&env);
    let id = funded(&env, &client, &admin, &owner, 365_000);
    client.stake(&owner, &id, &365_000);

    // Nothing is claimable until a calculation has run.
    env.ledger().set_timestamp(NOW + 3 * DAY);
    assert_eq!(client.claim_rewards(&owner, &id), 0);
    assert_eq!(client.calculate_rewards(&owner, &id), 300);

    env.ledger().set_timestamp(NOW + 4 * DAY - 1);
    assert_eq!(client.claim_rewards(&owner, &id), 300);

    let token = client.get_token(&owner, &id);
    assert_eq!(token.balance, 300);
    assert_eq!(token.rewards_earned, 0);
    assert_eq!(token.last_reward_calculation, NOW + 3 * DAY);

    let last_tx = client.list_transactions(&owner, &id).get(0).unwrap();
    assert_eq!(last_tx.kind, TransactionKind::Reward);
    assert_eq!(last_tx.amount, 300);

    assert_eq!(client.claim_rewards(&owner, &id), 0);

    // Claiming did not restart the clock.
    env.ledger().set_timestamp(NOW + 4 * DAY);
    assert_eq!(client.pending_rewards(&owner, &id), 100);
}

#[test]
fn test_apy_without_data_sources() {
    let (env, client, _) = setup();
    let owner = Address::generate(&env);
    assert_eq!(client.current_apy_bps(&owner), 1_000);
    assert_eq!(
        client.get_data_sources(),
        DataSources {
            health_records: None,
            predictions: None
        }
    );
}

// ── Transfers ───────────────────────────────────────────────────────────────

#[test]
fn test_transfer_between_same_symbol_tokens() {
    let (env, client, admin) = setup();
    let sender = Address::generate(&env);
    let recipient = Address::generate(&env);
    let from = funded(&env, &client, &admin, &sender, 1_000);
    let to = create(&env, &client, &recipient, "HLT");

    client.transfer(&sender, &from, &to, &250);
    assert_eq!(client.get_token(&sender, &from).balance, 750);
    assert_eq!(client.get_token(&recipient, &to).balance, 250);

    let sent = client.list_transactions(&sender, &from).get(0).unwrap();
    assert_eq!(sent.kind, TransactionKind::Transfer);
    assert_eq!(sent.from, Some(sender.clone()));
    assert_eq!(sent.to, Some(recipient.clone()));

    let received = client.list_transactions(&recipient, &to).get(0).unwrap();
    assert_eq!(received.kind, TransactionKind::Transfer);
    assert_eq!(received.amount, 250);
}

#[test]
fn test_transfer_rules() {
    let (env, client, admin) = setup();
    let sender = Address::generate(&env);
    let recipient = Address::generate(&env);
    let from = funded(&env, &client, &admin, &sender, 100);
    let other_symbol = create(&env, &client, &recipient, "FIT");
    let to = create(&env, &client, &recipient, "HLT");

    assert_eq!(
        client.try_transfer(&sender, &from, &other_symbol, &10),
        Err(Ok(ContractError::SymbolMismatch))
    );
    assert_eq!(
        client.try_transfer(&sender, &from, &to, &101),
        Err(Ok(ContractError::InsufficientBalance))
    );
    assert_eq!(
        client.try_transfer(&sender, &from, &from, &10),
        Err(Ok(ContractError::InvalidInput))
    );
    assert_eq!(
        client.try_transfer(&recipient, &from, &to, &10),
        Err(Ok(ContractError::Unauthorized))
    );

    client.delete_token(&recipient, &to);
    assert_eq!(
        client.try_transfer(&sender, &from, &to, &10),
        Err(Ok(ContractError::TokenNotFound))
    );
}

#[test]
fn test_create_and_transfer_are_rate_limited() {
    let (env, client, admin) = setup();
    let owner = Address::generate(&env);
    client.set_rate_limit_config(&admin, &2, &60);

    create(&env, &client, &owner, "HLT");
    create(&env, &client, &owner, "HLT");
    let err = client
        .try_create_token(
            &owner,
            &s(&env, "Third"),
            &s(&env, "HLT"),
            &s(&env, "net"),
            &Map::new(&env),
        )
        .unwrap_err()
        .unwrap();
    assert_eq!(err, ContractError::RateLimitExceeded);
    assert!(err.retryable());

    env.ledger().set_timestamp(NOW + 60);
    create(&env, &client, &owner, "HLT");
}

#[test]
fn test_unstake_rejects_positions_out_of_step() {
    let (env, client, admin) = setup();
    let owner = Address::generate(&env);
    let id = funded(&env, &client, &admin, &owner, 100);
    client.stake(&owner, &id, &100);

    env.as_contract(&client.address, || {
        positions::close_oldest_first(&env, id, 40);
    });

    assert_eq!(
        client.try_unstake(&owner, &id, &100),
        Err(Ok(ContractError::PositionMismatch))
    );
    assert_eq!(client.get_token(&owner, &id).staked_amount, 100);
    assert_eq!(client.unstake(&owner, &id, &60), 60);
}

#[test]
fn test_transaction_pages_newest_first() {
    let (env, client, admin) = setup();
    let owner = Address::generate(&env);
    let id = funded(&env, &client, &admin, &owner, 1_000);
    for _ in 0..60 {
        client.stake(&owner, &id, &1);
    }

    // Deploy mint, admin mint, then 60 stakes.
    assert_eq!(client.list_transactions(&owner, &id).len(), 62);

    let first = client.list_transactions_page(&owner, &id, &0, &5);
    assert_eq!(first.len(), 5);
    assert!(first.iter().all(|tx| tx.kind == TransactionKind::Stake));

    let tail = client.list_transactions_page(&owner, &id, &60, &5);
    assert_eq!(tail.len(), 2);
    assert_eq!(tail.get(0).unwrap().amount, 1_000);
    assert_eq!(tail.get(1).unwrap().amount, 0);
    assert!(first.get(0).unwrap().id > tail.get(0).unwrap().id);
}

#[test]
fn test_error_classification() {
    assert!(!ContractError::InsufficientBalance.retryable());
    assert_eq!(
        ContractError::TokenNotFound.category(),
        common::ErrorCategory::NotFound
    );
    assert_eq!(ContractError::InsufficientStakedAmount.message(), "Insufficient staked amount");
}
