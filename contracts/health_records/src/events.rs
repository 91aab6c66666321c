#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env, String};

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub timestamp: u64,
}

/// Fired on create, update and delete of a health record.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecordEvent {
    pub record_id: u64,
    pub owner: Address,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecordNftMintedEvent {
    pub record_id: u64,
    pub owner: Address,
    pub token_id: u64,
    pub ipfs_hash: String,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DeviceDataEvent {
    pub reading_id: u64,
    pub owner: Address,
    pub device_id: String,
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

pub fn publish_record_created(env: &Env, record_id: u64, owner: Address) {
    publish_record(env, symbol_short!("REC_NEW"), record_id, owner);
}

pub fn publish_record_updated(env: &Env, record_id: u64, owner: Address) {
    publish_record(env, symbol_short!("REC_UPD"), record_id, owner);
}

pub fn publish_record_deleted(env: &Env, record_id: u64, owner: Address) {
    publish_record(env, symbol_short!("REC_DEL"), record_id, owner);
}

fn publish_record(env: &Env, topic: soroban_sdk::Symbol, record_id: u64, owner: Address) {
    env.events().publish(
        (topic, owner.clone()),
        RecordEvent {
            record_id,
            owner,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_nft_minted(
    env: &Env,
    record_id: u64,
    owner: Address,
    token_id: u64,
    ipfs_hash: String,
) {
    env.events().publish(
        (symbol_short!("REC_NFT"), owner.clone()),
        RecordNftMintedEvent {
            record_id,
            owner,
            token_id,
            ipfs_hash,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_device_data(env: &Env, reading_id: u64, owner: Address, device_id: String) {
    env.events().publish(
        (symbol_short!("IOT_DATA"), owner.clone()),
        DeviceDataEvent {
            reading_id,
            owner,
            device_id,
            timestamp: env.ledger().timestamp(),
        },
    );
}
