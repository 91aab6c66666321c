#![no_main]

use arbitrary::Arbitrary;
use health_token::{HealthTokenContract, HealthTokenContractClient, PositionStatus};
use libfuzzer_sys::fuzz_target;
use soroban_sdk::{
    testutils::{Address as _, Ledger},
    Address, Env, Map, String,
};

const NOW: u64 = 1_700_000_000;

#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    Mint { amount: u64 },
    Stake { amount: u64 },
    Unstake { amount: u64 },
    CalculateRewards,
    ClaimRewards,
    Transfer { amount: u64 },
    AdvanceTime { seconds: u32 },
}

fuzz_target!(|actions: Vec<FuzzAction>| {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(NOW);

    let contract_id = env.register(HealthTokenContract, ());
    let client = HealthTokenContractClient::new(&env, &contract_id);
    let admin = Address::generate(&env);
    client.initialize(&admin);
    client.set_rate_limit_config(&admin, &0, &0);

    let name = String::from_str(&env, "Wellness");
    let symbol = String::from_str(&env, "HLT");
    let network = String::from_str(&env, "stellar-testnet");
    let owners = [Address::generate(&env), Address::generate(&env)];
    let tokens = [
        client.create_token(&owners[0], &name, &symbol, &network, &Map::new(&env)),
        client.create_token(&owners[1], &name, &symbol, &network, &Map::new(&env)),
    ];

    let mut now = NOW;
    for (i, action) in actions.into_iter().enumerate() {
        let side = i % 2;
        let (owner, token) = (&owners[side], tokens[side]);
        match action {
            FuzzAction::Mint { amount } => {
                let _ = client.try_mint(&admin, &token, &i128::from(amount));
            }
            FuzzAction::Stake { amount } => {
                let _ = client.try_stake(owner, &token, &i128::from(amount));
            }
            FuzzAction::Unstake { amount } => {
                let _ = client.try_unstake(owner, &token, &i128::from(amount));
            }
            FuzzAction::CalculateRewards => {
                let _ = client.try_calculate_rewards(owner, &token);
            }
            FuzzAction::ClaimRewards => {
                let _ = client.try_claim_rewards(owner, &token);
            }
            FuzzAction::Transfer { amount } => {
                let _ = client.try_transfer(owner, &token, &tokens[1 - side], &i128::from(amount));
            }
            FuzzAction::AdvanceTime { seconds } => {
                now = now.saturating_add(u64::from(seconds));
                env.ledger().set_timestamp(now);
            }
        }

        // Balances never go negative and open positions always back the stake.
        for (owner, token) in owners.iter().zip(tokens) {
            let state = client.get_token(owner, &token);
            assert!(state.balance >= 0);
            assert!(state.staked_amount >= 0);
            assert!(state.rewards_earned >= 0);
            let open: i128 = client
                .list_staking_positions(owner, &token)
                .iter()
                .filter(|p| p.status == PositionStatus::Active)
                .map(|p| p.amount)
                .sum();
            assert_eq!(open, state.staked_amount);
        }
    }
});
