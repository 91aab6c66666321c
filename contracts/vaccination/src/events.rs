#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env, Symbol};

use crate::RequestStatus;

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InsuranceSetEvent {
    pub insurance: Address,
    pub timestamp: u64,
}

/// Fired on create, update and delete of plain and COVID records.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VaccinationEvent {
    pub record_id: u64,
    pub owner: Address,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RequestStatusEvent {
    pub request_id: u64,
    pub owner: Address,
    pub status: RequestStatus,
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

pub fn publish_insurance_set(env: &Env, insurance: Address) {
    env.events().publish(
        (symbol_short!("SET_INS"),),
        InsuranceSetEvent {
            insurance,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_record(env: &Env, topic: Symbol, record_id: u64, owner: Address) {
    env.events().publish(
        (topic, owner.clone()),
        VaccinationEvent {
            record_id,
            owner,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_request_status(env: &Env, request_id: u64, owner: Address, status: RequestStatus) {
    env.events().publish(
        (symbol_short!("VREQ"), owner.clone()),
        RequestStatusEvent {
            request_id,
            owner,
            status,
            timestamp: env.ledger().timestamp(),
        },
    );
}
