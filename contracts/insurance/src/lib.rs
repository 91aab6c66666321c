#![no_std]

pub mod errors;
pub mod events;


use common::{
    admin_tiers::{self, AdminTier},
    index::{self, IndexScope},
    text, ttl,
};
use soroban_sdk::{
    contract, contractimpl, contracttype, symbol_short, Address, Env, String, Symbol, Vec,
};

pub use errors::ContractError;

// ── Storage keys ─────────────────────────────────────────────────────────────

const INITIALIZED: Symbol = symbol_short!("INIT");
const POL_CTR: Symbol = symbol_short!("POL_CTR");
const POLICY: Symbol = symbol_short!("POLICY");
const OWNER_POLICIES: Symbol = symbol_short!("OWN_POL");
const CLM_CTR: Symbol = symbol_short!("CLM_CTR");
const CLAIM: Symbol = symbol_short!("CLAIM");
const OWNER_CLAIMS: Symbol = symbol_short!("OWN_CLM");

const MAX_TEXT_LEN: u32 = 255;
const MAX_CURRENCY_LEN: u32 = 10;
const MAX_PERCENTAGE: u32 = 100;
const CLAIM_NUMBER_WIDTH: usize = 6;

// ── Types ────────────────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PolicyType {
    Health,
    Life,
    Disability,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PolicyStatus {
    Active,
    Inactive,
    Cancelled,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Beneficiary {
    pub name: String,
    pub relationship: String,
    pub percentage: u32,
}

/// Monetary amounts are in cents.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InsurancePolicy {
    pub id: u64,
    pub owner: Address,
    pub policy_type: PolicyType,
    pub coverage_amount: i128,
    pub premium_amount: i128,
    pub start_date: u64,
    pub end_date: u64,
    pub beneficiaries: Vec<Beneficiary>,
    pub terms_and_conditions: String,
    pub status: PolicyStatus,
    pub created_at: u64,
    pub updated_at: u64,
    pub deleted_at: Option<u64>,
}

impl InsurancePolicy {
    pub fn is_active(&self, now: u64) -> bool {
        self.status == PolicyStatus::Active && self.end_date > now
    }

    pub fn is_expired(&self, now: u64) -> bool {
        self.end_date < now
    }
}

/// Partial policy update; `None` leaves a field unchanged.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PolicyUpdate {
    pub policy_type: Option<PolicyType>,
    pub coverage_amount: Option<i128>,
    pub premium_amount: Option<i128>,
    pub start_date: Option<u64>,
    pub end_date: Option<u64>,
    pub beneficiaries: Option<Vec<Beneficiary>>,
    pub terms_and_conditions: Option<String>,
    pub status: Option<PolicyStatus>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ClaimStatus {
    Pending,
    Processing,
    Approved,
    Rejected,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InsuranceClaim {
    pub id: u64,
    pub claim_number: String,
    pub owner: Address,
    pub policy_id: u64,
    pub claim_amount: i128,
    pub currency: String,
    pub description: String,
    pub supporting_documents: Vec<String>,
    pub status: ClaimStatus,
    pub rejection_reason: Option<String>,
    pub processed_at: Option<u64>,
    pub created_at: u64,
    pub updated_at: u64,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct InsuranceContract;

#[contractimpl]
impl InsuranceContract {
    pub fn initialize(env: Env, admin: Address) -> Result<(), ContractError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::AlreadyInitialized);
        }
        admin.require_auth();

        env.storage().instance().set(&INITIALIZED, &true);
        admin_tiers::bootstrap(&env, &admin);
        ttl::extend_instance(&env);

        events::publish_initialized(&env, admin);
        Ok(())
    }

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    pub fn promote_admin(
        env: Env,
        caller: Address,
        target: Address,
        tier: AdminTier,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        if !admin_tiers::promote(&env, &caller, &target, tier) {
            return Err(ContractError::Unauthorized);
        }
        Ok(())
    }

    pub fn demote_admin(env: Env, caller: Address, target: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        if !admin_tiers::demote(&env, &caller, &target) {
            return Err(ContractError::Unauthorized);
        }
        Ok(())
    }

    pub fn get_admin_tier(env: Env, admin: Address) -> Option<AdminTier> {
        admin_tiers::get_tier(&env, &admin)
    }

    // ── Policies ────────────────────────────────────────────────────────────

    #[allow(clippy::too_many_arguments)]
    pub fn create_policy(
        env: Env,
        owner: Address,
        policy_type: PolicyType,
        coverage_amount: i128,
        premium_amount: i128,
        start_date: u64,
        end_date: u64,
        beneficiaries: Vec<Beneficiary>,
        terms_and_conditions: String,
    ) -> Result<u64, ContractError> {
        Self::require_initialized(&env)?;
        owner.require_auth();

        let id: u64 = env
            .storage()
            .instance()
            .get(&POL_CTR)
            .unwrap_or(0u64)
            .saturating_add(1);

        let now = env.ledger().timestamp();
        let policy = InsurancePolicy {
            id,
            owner: owner.clone(),
            policy_type,
            coverage_amount,
            premium_amount,
            start_date,
            end_date,
            beneficiaries,
            terms_and_conditions,
            status: PolicyStatus::Active,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        Self::validate_policy(&policy)?;

        env.storage().instance().set(&POL_CTR, &id);
        Self::save_policy(&env, &policy);
        index::push(&env, &OWNER_POLICIES, &IndexScope::Owner(owner.clone()), id);

        events::publish_policy_created(&env, id, owner);
        Ok(id)
    }

    pub fn get_policy(env: Env, caller: Address, policy_id: u64) -> Result<InsurancePolicy, ContractError> {
        caller.require_auth();
        Self::load_owned_policy(&env, &caller, policy_id)
    }

    pub fn list_policies(env: Env, owner: Address) -> Vec<InsurancePolicy> {
        owner.require_auth();
        Self::live_policies(&env, &owner)
    }

    /// Policies whose status is `Active`, regardless of end date.
    pub fn active_policies(env: Env, owner: Address) -> Vec<InsurancePolicy> {
        owner.require_auth();
        let mut out = Vec::new(&env);
        for policy in Self::live_policies(&env, &owner).iter() {
            if policy.status == PolicyStatus::Active {
                out.push_back(policy);
            }
        }
        out
    }

    pub fn expired_policies(env: Env, owner: Address) -> Vec<InsurancePolicy> {
        owner.require_auth();
        let now = env.ledger().timestamp();
        let mut out = Vec::new(&env);
        for policy in Self::live_policies(&env, &owner).iter() {
            if policy.is_expired(now) {
                out.push_back(policy);
            }
        }
        out
    }

    /// Applies the supplied fields. Any status may be set here; date ordering
    /// and amounts are validated against the merged policy.
    pub fn update_policy(
        env: Env,
        owner: Address,
        policy_id: u64,
        changes: PolicyUpdate,
    ) -> Result<InsurancePolicy, ContractError> {
        Self::require_initialized(&env)?;
        owner.require_auth();
        let mut policy = Self::load_owned_policy(&env, &owner, policy_id)?;

        if let Some(v) = changes.policy_type {
            policy.policy_type = v;
        }
        if let Some(v) = changes.coverage_amount {
            policy.coverage_amount = v;
        }
        if let Some(v) = changes.premium_amount {
            policy.premium_amount = v;
        }
        if let Some(v) = changes.start_date {
            policy.start_date = v;
        }
        if let Some(v) = changes.end_date {
            policy.end_date = v;
        }
        if let Some(v) = changes.beneficiaries {
            policy.beneficiaries = v;
        }
        if let Some(v) = changes.terms_and_conditions {
            policy.terms_and_conditions = v;
        }
        if let Some(v) = changes.status {
            policy.status = v;
        }
        Self::validate_policy(&policy)?;

        policy.updated_at = env.ledger().timestamp();
        Self::save_policy(&env, &policy);

        events::publish_policy_updated(&env, policy_id, owner);
        Ok(policy)
    }

    pub fn cancel_policy(env: Env, owner: Address, policy_id: u64) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        owner.require_auth();
        let mut policy = Self::load_owned_policy(&env, &owner, policy_id)?;

        let now = env.ledger().timestamp();
        if !policy.is_active(now) {
            return Err(ContractError::PolicyNotActive);
        }
        policy.status = PolicyStatus::Cancelled;
        policy.updated_at = now;
        Self::save_policy(&env, &policy);

        events::publish_policy_cancelled(&env, policy_id, owner);
        Ok(())
    }

    pub fn delete_policy(env: Env, owner: Address, policy_id: u64) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        owner.require_auth();
        let mut policy = Self::load_owned_policy(&env, &owner, policy_id)?;

        let now = env.ledger().timestamp();
        policy.deleted_at = Some(now);
        policy.updated_at = now;
        Self::save_policy(&env, &policy);

        events::publish_policy_deleted(&env, policy_id, owner);
        Ok(())
    }

    pub fn is_policy_active(env: Env, policy_id: u64) -> Result<bool, ContractError> {
        let policy = Self::load_live_policy(&env, policy_id).ok_or(ContractError::PolicyNotFound)?;
        Ok(policy.is_active(env.ledger().timestamp()))
    }

    pub fn is_policy_expired(env: Env, policy_id: u64) -> Result<bool, ContractError> {
        let policy = Self::load_live_policy(&env, policy_id).ok_or(ContractError::PolicyNotFound)?;
        Ok(policy.is_expired(env.ledger().timestamp()))
    }

    pub fn policy_owner(env: Env, policy_id: u64) -> Option<Address> {
        Self::load_live_policy(&env, policy_id).map(|p| p.owner)
    }

    // ── Claims ──────────────────────────────────────────────────────────────

    /// Files a claim against one of the owner's active policies. `currency`
    /// defaults to `USD`.
    pub fn file_claim(
        env: Env,
        owner: Address,
        policy_id: u64,
        claim_amount: i128,
        currency: Option<String>,
        description: String,
        supporting_documents: Vec<String>,
    ) -> Result<u64, ContractError> {
        Self::require_initialized(&env)?;
        owner.require_auth();
        let policy = Self::load_owned_policy(&env, &owner, policy_id)?;

        let now = env.ledger().timestamp();
        if !policy.is_active(now) {
            return Err(ContractError::PolicyNotActive);
        }
        if claim_amount <= 0 {
            return Err(ContractError::InvalidInput);
        }
        if claim_amount > policy.coverage_amount {
            return Err(ContractError::ClaimExceedsCoverage);
        }
        let currency = currency.unwrap_or(String::from_str(&env, "USD"));
        if currency.is_empty() || currency.len() > MAX_CURRENCY_LEN {
            return Err(ContractError::InvalidInput);
        }
        if description.is_empty() {
            return Err(ContractError::InvalidInput);
        }

        let id: u64 = env
            .storage()
            .instance()
            .get(&CLM_CTR)
            .unwrap_or(0u64)
            .saturating_add(1);
        env.storage().instance().set(&CLM_CTR, &id);

        let claim_number = text::prefixed_id(&env, "CLM-", id, CLAIM_NUMBER_WIDTH);
        let claim = InsuranceClaim {
            id,
            claim_number: claim_number.clone(),
            owner: owner.clone(),
            policy_id,
            claim_amount,
            currency,
            description,
            supporting_documents,
            status: ClaimStatus::Pending,
            rejection_reason: None,
            processed_at: None,
            created_at: now,
            updated_at: now,
        };
        Self::save_claim(&env, &claim);
        index::push(&env, &OWNER_CLAIMS, &IndexScope::Owner(owner.clone()), id);

        events::publish_claim_filed(&env, id, claim_number, policy_id, owner, claim_amount);
        Ok(id)
    }

    pub fn start_processing(env: Env, adjuster: Address, claim_id: u64) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        Self::require_admin(&env, &adjuster, AdminTier::ContractAdmin)?;
        let mut claim = Self::load_claim(&env, claim_id)?;

        if claim.status != ClaimStatus::Pending {
            return Err(ContractError::InvalidStatusTransition);
        }
        claim.status = ClaimStatus::Processing;
        claim.updated_at = env.ledger().timestamp();
        Self::save_claim(&env, &claim);

        events::publish_claim_status(&env, claim_id, adjuster, ClaimStatus::Processing);
        Ok(())
    }

    pub fn approve_claim(env: Env, adjuster: Address, claim_id: u64) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        Self::require_admin(&env, &adjuster, AdminTier::ContractAdmin)?;
        let mut claim = Self::load_claim(&env, claim_id)?;
        Self::ensure_unprocessed(&claim)?;

        let now = env.ledger().timestamp();
        claim.status = ClaimStatus::Approved;
        claim.processed_at = Some(now);
        claim.updated_at = now;
        Self::save_claim(&env, &claim);

        events::publish_claim_status(&env, claim_id, adjuster, ClaimStatus::Approved);
        Ok(())
    }

    pub fn reject_claim(
        env: Env,
        adjuster: Address,
        claim_id: u64,
        reason: String,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        Self::require_admin(&env, &adjuster, AdminTier::ContractAdmin)?;
        if reason.is_empty() {
            return Err(ContractError::InvalidInput);
        }
        let mut claim = Self::load_claim(&env, claim_id)?;
        Self::ensure_unprocessed(&claim)?;

        let now = env.ledger().timestamp();
        claim.status = ClaimStatus::Rejected;
        claim.rejection_reason = Some(reason);
        claim.processed_at = Some(now);
        claim.updated_at = now;
        Self::save_claim(&env, &claim);

        events::publish_claim_status(&env, claim_id, adjuster, ClaimStatus::Rejected);
        Ok(())
    }

    /// Readable by the claimant and by claim adjusters.
    pub fn get_claim(env: Env, caller: Address, claim_id: u64) -> Result<InsuranceClaim, ContractError> {
        caller.require_auth();
        let claim = Self::load_claim(&env, claim_id)?;
        if claim.owner != caller && !admin_tiers::require_tier(&env, &caller, &AdminTier::ContractAdmin) {
            return Err(ContractError::Unauthorized);
        }
        Ok(claim)
    }

    pub fn list_claims(env: Env, owner: Address) -> Vec<InsuranceClaim> {
        owner.require_auth();
        let ids = index::all(&env, &OWNER_CLAIMS, &IndexScope::Owner(owner));
        let mut out = Vec::new(&env);
        for id in ids.iter().rev() {
            if let Some(claim) = env.storage().persistent().get::<_, InsuranceClaim>(&(CLAIM, id)) {
                out.push_back(claim);
            }
        }
        out
    }

    // ── Internal helpers ────────────────────────────────────────────────────

    fn require_initialized(env: &Env) -> Result<(), ContractError> {
        if !env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::NotInitialized);
        }
        Ok(())
    }

    fn require_admin(env: &Env, caller: &Address, min: AdminTier) -> Result<(), ContractError> {
        caller.require_auth();
        if !admin_tiers::require_tier(env, caller, &min) {
            return Err(ContractError::Unauthorized);
        }
        Ok(())
    }

    fn validate_policy(policy: &InsurancePolicy) -> Result<(), ContractError> {
        if policy.coverage_amount < 0 || policy.premium_amount < 0 {
            return Err(ContractError::InvalidInput);
        }
        if policy.end_date <= policy.start_date {
            return Err(ContractError::InvalidInput);
        }
        if policy.terms_and_conditions.is_empty() {
            return Err(ContractError::InvalidInput);
        }
        if policy.beneficiaries.is_empty() {
            return Err(ContractError::InvalidInput);
        }
        for b in policy.beneficiaries.iter() {
            if b.name.is_empty()
                || b.name.len() > MAX_TEXT_LEN
                || b.relationship.is_empty()
                || b.relationship.len() > MAX_TEXT_LEN
                || b.percentage > MAX_PERCENTAGE
            {
                return Err(ContractError::InvalidInput);
            }
        }
        Ok(())
    }

    fn ensure_unprocessed(claim: &InsuranceClaim) -> Result<(), ContractError> {
        match claim.status {
            ClaimStatus::Approved | ClaimStatus::Rejected => Err(ContractError::ClaimAlreadyProcessed),
            ClaimStatus::Pending | ClaimStatus::Processing => Ok(()),
        }
    }

    fn save_policy(env: &Env, policy: &InsurancePolicy) {
        let key = (POLICY, policy.id);
        env.storage().persistent().set(&key, policy);
        ttl::extend_persistent(env, &key);
    }

    fn save_claim(env: &Env, claim: &InsuranceClaim) {
        let key = (CLAIM, claim.id);
        env.storage().persistent().set(&key, claim);
        ttl::extend_persistent(env, &key);
    }

    fn load_live_policy(env: &Env, policy_id: u64) -> Option<InsurancePolicy> {
        let policy: InsurancePolicy = env.storage().persistent().get(&(POLICY, policy_id))?;
        if policy.deleted_at.is_some() {
            return None;
        }
        Some(policy)
    }

    fn load_owned_policy(
        env: &Env,
        caller: &Address,
        policy_id: u64,
    ) -> Result<InsurancePolicy, ContractError> {
        let policy = Self::load_live_policy(env, policy_id).ok_or(ContractError::PolicyNotFound)?;
        if policy.owner != *caller {
            return Err(ContractError::Unauthorized);
        }
        Ok(policy)
    }

    fn load_claim(env: &Env, claim_id: u64) -> Result<InsuranceClaim, ContractError> {
        env.storage()
            .persistent()
            .get(&(CLAIM, claim_id))
            .ok_or(ContractError::ClaimNotFound)
    }

    fn live_policies(env: &Env, owner: &Address) -> Vec<InsurancePolicy> {
        let ids = index::all(env, &OWNER_POLICIES, &IndexScope::Owner(owner.clone()));
        let mut out = Vec::new(env);
        for id in ids.iter().rev() {
            if let Some(policy) = Self::load_live_policy(env, id) {
                out.push_back(policy);
            }
        }
        out
    }
}
