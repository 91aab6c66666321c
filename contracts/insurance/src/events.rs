#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env, String, Symbol};

use crate::ClaimStatus;

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PolicyEvent {
    pub policy_id: u64,
    pub owner: Address,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClaimFiledEvent {
    pub claim_id: u64,
    pub claim_number: String,
    pub policy_id: u64,
    pub owner: Address,
    pub claim_amount: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClaimStatusEvent {
    pub claim_id: u64,
    pub adjuster: Address,
    pub status: ClaimStatus,
    pub timestamp: u64,
}

pub fn publish_initialized(env: &Env, admin: Address) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            admin,
            timestamp: env.ledger().timestamp(),
        },
    );
}

fn publish_policy(env: &Env, topic: Symbol, policy_id: u64, owner: Address) {
    env.events().publish(
        (topic, owner.clone()),
        PolicyEvent {
            policy_id,
            owner,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_policy_created(env: &Env, policy_id: u64, owner: Address) {
    publish_policy(env, symbol_short!("POL_NEW"), policy_id, owner);
}

pub fn publish_policy_updated(env: &Env, policy_id: u64, owner: Address) {
    publish_policy(env, symbol_short!("POL_UPD"), policy_id, owner);
}

pub fn publish_policy_cancelled(env: &Env, policy_id: u64, owner: Address) {
    publish_policy(env, symbol_short!("POL_CNCL"), policy_id, owner);
}

pub fn publish_policy_deleted(env: &Env, policy_id: u64, owner: Address) {
    publish_policy(env, symbol_short!("POL_DEL"), policy_id, owner);
}

pub fn publish_claim_filed(
    env: &Env,
    claim_id: u64,
    claim_number: String,
    policy_id: u64,
    owner: Address,
    claim_amount: i128,
) {
    env.events().publish(
        (symbol_short!("CLM_NEW"), owner.clone()),
        ClaimFiledEvent {
            claim_id,
            claim_number,
            policy_id,
            owner,
            claim_amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_claim_status(env: &Env, claim_id: u64, adjuster: Address, status: ClaimStatus) {
    env.events().publish(
        (symbol_short!("CLM_STAT"), claim_id),
        ClaimStatusEvent {
            claim_id,
            adjuster,
            status,
            timestamp: env.ledger().timestamp(),
        },
    );
}
