#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env, String, Symbol};

use crate::RequestStatus;

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OperatorEvent {
    pub operator: Address,
    pub active: bool,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PredictionRequestEvent {
    pub request_id: u64,
    pub owner: Address,
    pub health_record_id: u64,
    pub prediction_type: String,
    pub status: RequestStatus,
    pub timestamp: u64,
}

/// Fired on create, update, delete and NFT mint of a prediction.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PredictionEvent {
    pub prediction_id: u64,
    pub owner: Address,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SymptomEvent {
    pub symptom_id: u64,
    pub owner: Address,
    pub requires_medical_attention: bool,
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

pub fn publish_operator(env: &Env, operator: Address, active: bool) {
    env.events().publish(
        (symbol_short!("AI_OP"), operator.clone()),
        OperatorEvent {
            operator,
            active,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_request(
    env: &Env,
    request_id: u64,
    owner: Address,
    health_record_id: u64,
    prediction_type: String,
    status: RequestStatus,
) {
    env.events().publish(
        (symbol_short!("PRED_REQ"), owner.clone()),
        PredictionRequestEvent {
            request_id,
            owner,
            health_record_id,
            prediction_type,
            status,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_prediction(env: &Env, topic: Symbol, prediction_id: u64, owner: Address) {
    env.events().publish(
        (topic, owner.clone()),
        PredictionEvent {
            prediction_id,
            owner,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_symptom(
    env: &Env,
    topic: Symbol,
    symptom_id: u64,
    owner: Address,
    requires_medical_attention: bool,
) {
    env.events().publish(
        (topic, owner.clone()),
        SymptomEvent {
            symptom_id,
            owner,
            requires_medical_attention,
            timestamp: env.ledger().timestamp(),
        },
    );
}
