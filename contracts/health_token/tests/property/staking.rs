//! Properties of the token staking flow.
//!
//! Invariants tested:
//! - Staking then unstaking the same amount restores the liquid balance
//! - `stake` fails exactly when the amount exceeds the liquid balance
//! - `unstake` fails exactly when the amount exceeds the staked amount
//! - Reward calculation only ever changes `rewards_earned`
//! - Open positions always sum to the staked amount

use health_token::{ContractError, HealthTokenContract, HealthTokenContractClient};
use proptest::prelude::*;
use soroban_sdk::testutils::{Address as _, Ledger};
use soroban_sdk::{Address, Env, Map, String};

const NOW: u64 = 1_700_000_000;
const DAY: u64 = 86_400;

fn setup(balance: i128) -> (Env, HealthTokenContractClient<'static>, Address, u64) {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(NOW);

    let contract_id = env.register(HealthTokenContract, ());
    let client = HealthTokenContractClient::new(&env, &contract_id);
    let admin = Address::generate(&env);
    client.initialize(&admin);
    client.set_rate_limit_config(&admin, &0, &0);

    let owner = Address::generate(&env);
    let token = client.create_token(
        &owner,
        &String::from_str(&env, "Wellness"),
        &String::from_str(&env, "HLT"),
        &String::from_str(&env, "stellar-testnet"),
        &Map::new(&env),
    );
    if balance > 0 {
        client.mint(&admin, &token, &balance);
    }
    (env, client, owner, token)
}

fn open_total(client: &HealthTokenContractClient, owner: &Address, token: u64) -> i128 {
    client
        .list_staking_positions(owner, &token)
        .iter()
        .filter(|p| p.status == health_token::PositionStatus::Active)
        .map(|p| p.amount)
        .sum()
}

proptest! {
    #[test]
    fn prop_stake_unstake_round_trip(
        balance in 1i128..=1_000_000_000i128,
        pct in 1u32..=100u32,
    ) {
        let (_env, client, owner, token) = setup(balance);
        let amount = (balance * i128::from(pct) / 100).max(1);

        client.stake(&owner, &token, &amount);
        client.unstake(&owner, &token, &amount);

        let after = client.get_token(&owner, &token);
        prop_assert_eq!(after.balance, balance);
        prop_assert_eq!(after.staked_amount, 0);
        prop_assert_eq!(open_total(&client, &owner, token), 0);
    }

    #[test]
    fn prop_stake_fails_iff_over_balance(
        balance in 0i128..=1_000_000i128,
        amount in 1i128..=2_000_000i128,
    ) {
        let (_env, client, owner, token) = setup(balance);
        let result = client.try_stake(&owner, &token, &amount);
        if amount > balance {
            prop_assert_eq!(result, Err(Ok(ContractError::InsufficientBalance)));
        } else {
            prop_assert!(result.is_ok());
        }
    }

    #[test]
    fn prop_unstake_fails_iff_over_staked(
        staked in 1i128..=1_000_000i128,
        amount in 1i128..=2_000_000i128,
    ) {
        let (_env, client, owner, token) = setup(staked);
        client.stake(&owner, &token, &staked);
        let result = client.try_unstake(&owner, &token, &amount);
        if amount > staked {
            prop_assert_eq!(result, Err(Ok(ContractError::InsufficientStakedAmount)));
        } else {
            prop_assert!(result.is_ok());
        }
    }

    #[test]
    fn prop_rewards_only_touch_rewards_earned(
        balance in 1i128..=1_000_000_000i128,
        days in 0u64..=730u64,
    ) {
        let (env, client, owner, token) = setup(balance);
        client.stake(&owner, &token, &balance);
        let before = client.get_token(&owner, &token);

        env.ledger().set_timestamp(NOW + days * DAY);
        let reward = client.calculate_rewards(&owner, &token);
        let after = client.get_token(&owner, &token);

        prop_assert!(reward >= 0);
        prop_assert_eq!(after.balance, before.balance);
        prop_assert_eq!(after.staked_amount, before.staked_amount);
        prop_assert_eq!(after.rewards_earned, before.rewards_earned + reward);
    }

    #[test]
    fn prop_positions_cover_stake(
        stakes in proptest::collection::vec(1i128..=1_000i128, 1..6),
        unstake_pct in 0u32..=100u32,
    ) {
        let total: i128 = stakes.iter().sum();
        let (_env, client, owner, token) = setup(total);
        for amount in &stakes {
            client.stake(&owner, &token, amount);
        }
        let withdraw = total * i128::from(unstake_pct) / 100;
        if withdraw > 0 {
            client.unstake(&owner, &token, &withdraw);
        }

        let staked = client.get_token(&owner, &token).staked_amount;
        prop_assert_eq!(staked, total - withdraw);
        prop_assert_eq!(open_total(&client, &owner, token), staked);
    }
}
