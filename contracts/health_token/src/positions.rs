//! Staking position ledger.
//!
//! Each stake opens a position carrying the APY at the time of staking.
//! Unstaking consumes open positions oldest-first; a partially consumed
//! position is split into a closed part and a smaller open remainder.
//!
//! Every position id goes into the token's paged history. Only open ids are
//! kept in `TOK_OPEN`, which is pruned as positions close.

use soroban_sdk::{contracttype, symbol_short, Env, Symbol, Vec};

use common::{
    index::{self, IndexScope},
    ttl,
};

const POS_CTR: Symbol = symbol_short!("POS_CTR");
const POSITION: Symbol = symbol_short!("POSITION");
const TOKEN_POSITIONS: Symbol = symbol_short!("TOK_POS");
const OPEN_POSITIONS: Symbol = symbol_short!("TOK_OPEN");

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PositionStatus {
    Active,
    Closed,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakingPosition {
    pub id: u64,
    pub token_id: u64,
    pub amount: i128,
    pub apy_bps: u32,
    pub start_date: u64,
    pub end_date: Option<u64>,
    pub rewards_earned: i128,
    pub status: PositionStatus,
}

fn next_id(env: &Env) -> u64 {
    let id: u64 = env
        .storage()
        .instance()
        .get(&POS_CTR)
        .unwrap_or(0u64)
        .saturating_add(1);
    env.storage().instance().set(&POS_CTR, &id);
    id
}

fn store(env: &Env, position: &StakingPosition) {
    let key = (POSITION, position.id);
    env.storage().persistent().set(&key, position);
    ttl::extend_persistent(env, &key);
}

fn open_ids(env: &Env, token_id: u64) -> Vec<u64> {
    env.storage()
        .persistent()
        .get(&(OPEN_POSITIONS, token_id))
        .unwrap_or(Vec::new(env))
}

fn set_open_ids(env: &Env, token_id: u64, ids: &Vec<u64>) {
    let key = (OPEN_POSITIONS, token_id);
    env.storage().persistent().set(&key, ids);
    ttl::extend_persistent(env, &key);
}

fn create(env: &Env, mut position: StakingPosition) -> StakingPosition {
    position.id = next_id(env);
    store(env, &position);
    index::push(
        env,
        &TOKEN_POSITIONS,
        &IndexScope::Parent(position.token_id),
        position.id,
    );
    if position.status == PositionStatus::Active {
        let mut open = open_ids(env, position.token_id);
        open.push_back(position.id);
        set_open_ids(env, position.token_id, &open);
    }
    position
}

pub fn get(env: &Env, position_id: u64) -> Option<StakingPosition> {
    env.storage().persistent().get(&(POSITION, position_id))
}

pub fn open(env: &Env, token_id: u64, amount: i128, apy_bps: u32) -> StakingPosition {
    create(
        env,
        StakingPosition {
            id: 0,
            token_id,
            amount,
            apy_bps,
            start_date: env.ledger().timestamp(),
            end_date: None,
            rewards_earned: 0,
            status: PositionStatus::Active,
        },
    )
}

/// Closes `amount` worth of open positions, oldest first.
///
/// Returns the amount that could not be matched against open positions,
/// which is zero whenever the positions cover the token's staked amount.
pub fn close_oldest_first(env: &Env, token_id: u64, amount: i128) -> i128 {
    let now = env.ledger().timestamp();
    let mut remaining = amount;
    let mut still_open = Vec::new(env);
    for id in open_ids(env, token_id).iter() {
        if remaining <= 0 {
            still_open.push_back(id);
            continue;
        }
        let Some(mut position) = get(env, id) else {
            continue;
        };

        if position.amount <= remaining {
            remaining = remaining.saturating_sub(position.amount);
            position.status = PositionStatus::Closed;
            position.end_date = Some(now);
            store(env, &position);
        } else {
            position.amount = position.amount.saturating_sub(remaining);
            store(env, &position);
            still_open.push_back(id);
            create(
                env,
                StakingPosition {
                    id: 0,
                    token_id,
                    amount: remaining,
                    apy_bps: position.apy_bps,
                    start_date: position.start_date,
                    end_date: Some(now),
                    rewards_earned: 0,
                    status: PositionStatus::Closed,
                },
            );
            remaining = 0;
        }
    }
    set_open_ids(env, token_id, &still_open);
    remaining
}

/// All positions of a token, newest first.
pub fn list(env: &Env, token_id: u64) -> Vec<StakingPosition> {
    let mut out = Vec::new(env);
    let ids = index::all(env, &TOKEN_POSITIONS, &IndexScope::Parent(token_id));
    for id in ids.iter().rev() {
        if let Some(position) = get(env, id) {
            out.push_back(position);
        }
    }
    out
}

/// Credits each open position with its pro-rata share of `reward`,
/// truncated per position.
pub fn attribute_rewards(env: &Env, token_id: u64, reward: i128, staked: i128) {
    if reward <= 0 || staked <= 0 {
        return;
    }
    for id in open_ids(env, token_id).iter() {
        let Some(mut position) = get(env, id) else {
            continue;
        };
        let share = position
            .amount
            .checked_mul(reward)
            .map(|v| v / staked)
            .unwrap_or(0);
        if share > 0 {
            position.rewards_earned = position.rewards_earned.saturating_add(share);
            store(env, &position);
        }
    }
}
