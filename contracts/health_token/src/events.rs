#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env, String, Symbol};

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the contract is bootstrapped.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DataSourcesSetEvent {
    pub health_records: Option<Address>,
    pub predictions: Option<Address>,
    pub timestamp: u64,
}

/// Fired when a new health token is created.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokenDeployedEvent {
    pub token_id: u64,
    pub owner: Address,
    pub name: String,
    pub symbol: String,
    pub network: String,
    pub timestamp: u64,
}

/// Fired on update and soft delete of a token.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokenEvent {
    pub token_id: u64,
    pub owner: Address,
    pub timestamp: u64,
}

/// Fired for every balance movement: mint, stake, unstake, reward claim
/// and transfer.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BalanceEvent {
    pub token_id: u64,
    pub owner: Address,
    pub amount: i128,
    pub balance: i128,
    pub staked_amount: i128,
    pub timestamp: u64,
}

/// Fired when pending rewards are folded into `rewards_earned`.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardsCalculatedEvent {
    pub token_id: u64,
    pub owner: Address,
    pub reward: i128,
    pub rewards_earned: i128,
    pub days: u64,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransferEvent {
    pub from_token: u64,
    pub to_token: u64,
    pub from: Address,
    pub to: Address,
    pub amount: i128,
    pub timestamp: u64,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(env: &Env, admin: Address) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            admin,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_data_sources_set(
    env: &Env,
    health_records: Option<Address>,
    predictions: Option<Address>,
) {
    env.events().publish(
        (symbol_short!("SET_SRC"),),
        DataSourcesSetEvent {
            health_records,
            predictions,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_token_deployed(
    env: &Env,
    token_id: u64,
    owner: Address,
    name: String,
    symbol: String,
    network: String,
) {
    env.events().publish(
        (symbol_short!("TOK_DEPL"), owner.clone()),
        TokenDeployedEvent {
            token_id,
            owner,
            name,
            symbol,
            network,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_token(env: &Env, topic: Symbol, token_id: u64, owner: Address) {
    env.events().publish(
        (topic, owner.clone()),
        TokenEvent {
            token_id,
            owner,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_balance(
    env: &Env,
    topic: Symbol,
    token_id: u64,
    owner: Address,
    amount: i128,
    balance: i128,
    staked_amount: i128,
) {
    env.events().publish(
        (topic, owner.clone()),
        BalanceEvent {
            token_id,
            owner,
            amount,
            balance,
            staked_amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_rewards_calculated(
    env: &Env,
    token_id: u64,
    owner: Address,
    reward: i128,
    rewards_earned: i128,
    days: u64,
) {
    env.events().publish(
        (symbol_short!("RWD_CALC"), owner.clone()),
        RewardsCalculatedEvent {
            token_id,
            owner,
            reward,
            rewards_earned,
            days,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_transfer(
    env: &Env,
    from_token: u64,
    to_token: u64,
    from: Address,
    to: Address,
    amount: i128,
) {
    env.events().publish(
        (symbol_short!("TRANSFER"), from.clone(), to.clone()),
        TransferEvent {
            from_token,
            to_token,
            from,
            to,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}
