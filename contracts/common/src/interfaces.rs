//! Cross-contract interfaces.
//!
//! Contracts call each other through these generated clients instead of
//! linking one another's implementations, so each contract only needs the
//! address of its peer (configured by an admin at runtime).

use soroban_sdk::{contractclient, contracttype, Address, Env};

/// Prediction tallies used by the staking reward compliance bonus.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ComplianceCounts {
    pub total: u32,
    pub completed: u32,
}

#[contractclient(name = "HealthRecordsClient")]
pub trait HealthRecordsInterface {
    /// Owner of a live health record, or `None` if missing or deleted.
    fn record_owner(env: Env, record_id: u64) -> Option<Address>;

    /// Health score of the owner's newest live record; 0 when unavailable.
    fn latest_health_score(env: Env, owner: Address) -> u32;
}

#[contractclient(name = "PredictionsClient")]
pub trait PredictionsInterface {
    fn compliance_counts(env: Env, owner: Address, since: u64) -> ComplianceCounts;
}

#[contractclient(name = "InsuranceClient")]
pub trait InsuranceInterface {
    fn policy_owner(env: Env, policy_id: u64) -> Option<Address>;
}
