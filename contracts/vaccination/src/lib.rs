#![no_std]

pub mod details;
pub mod errors;
pub mod events;


use common::{
    admin_tiers::{self, AdminTier},
    index::{self, IndexScope},
    nft::{self, NftRef},
    rate_limit::{self, RateLimiterConfig},
    ttl, InsuranceClient,
};
use soroban_sdk::{
    contract, contractimpl, contracttype, symbol_short, Address, Env, Symbol, Vec,
};

pub use details::{CovidStatistics, VaccinationDetails, VaccinationStatistics};
pub use errors::ContractError;

// ── Storage keys ─────────────────────────────────────────────────────────────

const INITIALIZED: Symbol = symbol_short!("INIT");
const INSURANCE: Symbol = symbol_short!("INS_ADDR");

const VAC_CTR: Symbol = symbol_short!("VAC_CTR");
const VACCINATION: Symbol = symbol_short!("VACC");
const OWNER_VACCINATIONS: Symbol = symbol_short!("OWN_VAC");

const COV_CTR: Symbol = symbol_short!("COV_CTR");
const COVID: Symbol = symbol_short!("COVID");
const OWNER_COVID: Symbol = symbol_short!("OWN_COV");

const REQ_CTR: Symbol = symbol_short!("REQ_CTR");
const REQUEST: Symbol = symbol_short!("VREQ");
const OWNER_REQUESTS: Symbol = symbol_short!("OWN_REQ");
const ALL_REQUESTS: Symbol = symbol_short!("ALL_REQ");

// ── Types ────────────────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VaccinationRecord {
    pub id: u64,
    pub owner: Address,
    pub details: VaccinationDetails,
    pub insurance_policy_id: Option<u64>,
    pub created_at: u64,
    pub updated_at: u64,
    pub deleted_at: Option<u64>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CovidVaccinationRecord {
    pub id: u64,
    pub owner: Address,
    pub details: VaccinationDetails,
    pub insurance_policy_id: u64,
    /// Cents.
    pub coverage_amount: Option<i128>,
    pub nft: Option<NftRef>,
    pub created_at: u64,
    pub updated_at: u64,
    pub deleted_at: Option<u64>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BlockchainStatus {
    Pending,
    Confirmed,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VaccinationRequest {
    pub id: u64,
    pub owner: Address,
    pub details: VaccinationDetails,
    pub insurance_policy_id: Option<u64>,
    pub status: RequestStatus,
    pub reviewed_by: Option<Address>,
    pub nft: Option<NftRef>,
    pub created_at: u64,
    pub updated_at: u64,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct VaccinationContract;

#[contractimpl]
impl VaccinationContract {
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

    // ── Administration ──────────────────────────────────────────────────────

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

    /// Points the contract at the insurance contract used to verify policies.
    pub fn set_insurance(env: Env, caller: Address, insurance: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        Self::require_admin(&env, &caller, AdminTier::ContractAdmin)?;
        env.storage().instance().set(&INSURANCE, &insurance);
        events::publish_insurance_set(&env, insurance);
        Ok(())
    }

    pub fn get_insurance(env: Env) -> Option<Address> {
        env.storage().instance().get(&INSURANCE)
    }

    pub fn set_rate_limit_config(
        env: Env,
        caller: Address,
        max_requests_per_window: u64,
        window_duration_seconds: u64,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        Self::require_admin(&env, &caller, AdminTier::ContractAdmin)?;
        rate_limit::set_config(
            &env,
            &RateLimiterConfig::new(max_requests_per_window, window_duration_seconds),
        );
        Ok(())
    }

    pub fn get_rate_limit_config(env: Env) -> RateLimiterConfig {
        rate_limit::get_config(&env)
    }

    // ── Vaccination records ─────────────────────────────────────────────────

    pub fn create_vaccination(
        env: Env,
        owner: Address,
        details: VaccinationDetails,
        insurance_policy_id: Option<u64>,
    ) -> Result<u64, ContractError> {
        Self::require_initialized(&env)?;
        owner.require_auth();
        details.validate()?;
        if let Some(policy_id) = insurance_policy_id {
            Self::check_policy(&env, &owner, policy_id)?;
        }

        let id = Self::next_id(&env, VAC_CTR);
        let now = env.ledger().timestamp();
        let record = VaccinationRecord {
            id,
            owner: owner.clone(),
            details,
            insurance_policy_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        Self::save(&env, (VACCINATION, id), &record);
        index::push(&env, &OWNER_VACCINATIONS, &IndexScope::Owner(owner.clone()), id);

        events::publish_record(&env, symbol_short!("VAC_NEW"), id, owner);
        Ok(id)
    }

    pub fn get_vaccination(env: Env, caller: Address, record_id: u64) -> Result<VaccinationRecord, ContractError> {
        caller.require_auth();
        Self::load_vaccination(&env, &caller, record_id)
    }

    pub fn list_vaccinations(env: Env, owner: Address) -> Vec<VaccinationRecord> {
        owner.require_auth();
        Self::live_vaccinations(&env, &owner)
    }

    pub fn update_vaccination(
        env: Env,
        owner: Address,
        record_id: u64,
        details: VaccinationDetails,
        insurance_policy_id: Option<u64>,
    ) -> Result<VaccinationRecord, ContractError> {
        Self::require_initialized(&env)?;
        owner.require_auth();
        let mut record = Self::load_vaccination(&env, &owner, record_id)?;
        details.validate()?;
        if let Some(policy_id) = insurance_policy_id {
            Self::check_policy(&env, &owner, policy_id)?;
        }

        record.details = details;
        record.insurance_policy_id = insurance_policy_id;
        record.updated_at = env.ledger().timestamp();
        Self::save(&env, (VACCINATION, record_id), &record);

        events::publish_record(&env, symbol_short!("VAC_UPD"), record_id, owner);
        Ok(record)
    }

    pub fn delete_vaccination(env: Env, owner: Address, record_id: u64) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        owner.require_auth();
        let mut record = Self::load_vaccination(&env, &owner, record_id)?;

        let now = env.ledger().timestamp();
        record.deleted_at = Some(now);
        record.updated_at = now;
        Self::save(&env, (VACCINATION, record_id), &record);

        events::publish_record(&env, symbol_short!("VAC_DEL"), record_id, owner);
        Ok(())
    }

    /// Records whose next dose is still ahead, newest first.
    pub fn vaccinations_needing_follow_up(env: Env, owner: Address) -> Vec<VaccinationRecord> {
        owner.require_auth();
        let now = env.ledger().timestamp();
        let mut out = Vec::new(&env);
        for record in Self::live_vaccinations(&env, &owner).iter() {
            if record.details.needs_follow_up(now) {
                out.push_back(record);
            }
        }
        out
    }

    pub fn is_vaccination_complete(env: Env, caller: Address, record_id: u64) -> Result<bool, ContractError> {
        caller.require_auth();
        let record = Self::load_vaccination(&env, &caller, record_id)?;
        Ok(record.details.is_complete(env.ledger().timestamp()))
    }

    pub fn days_until_next_dose(env: Env, caller: Address, record_id: u64) -> Result<i64, ContractError> {
        caller.require_auth();
        let record = Self::load_vaccination(&env, &caller, record_id)?;
        Ok(record.details.days_until_next_dose(env.ledger().timestamp()))
    }

    pub fn vaccination_statistics(env: Env, owner: Address) -> VaccinationStatistics {
        owner.require_auth();
        let now = env.ledger().timestamp();
        let mut stats = details::empty_statistics(&env);
        for record in Self::live_vaccinations(&env, &owner).iter() {
            details::tally(&mut stats, &record.details, now);
        }
        stats
    }

    // ── COVID-19 vaccination records ────────────────────────────────────────

    /// Creates the record and mints its NFT in the same call. Rate-limited
    /// per owner.
    pub fn create_covid_record(
        env: Env,
        owner: Address,
        details: VaccinationDetails,
        insurance_policy_id: u64,
        coverage_amount: Option<i128>,
    ) -> Result<u64, ContractError> {
        Self::require_initialized(&env)?;
        owner.require_auth();
        details.validate()?;
        Self::validate_coverage(coverage_amount)?;
        Self::check_policy(&env, &owner, insurance_policy_id)?;
        if !rate_limit::enforce(&env, &owner) {
            return Err(ContractError::RateLimitExceeded);
        }

        let id = Self::next_id(&env, COV_CTR);
        let token = nft::mint(&env, &owner, details::covid_nft_metadata(&env, id, &details));
        let now = env.ledger().timestamp();
        let record = CovidVaccinationRecord {
            id,
            owner: owner.clone(),
            details,
            insurance_policy_id,
            coverage_amount,
            nft: Some(token),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        Self::save(&env, (COVID, id), &record);
        index::push(&env, &OWNER_COVID, &IndexScope::Owner(owner.clone()), id);

        events::publish_record(&env, symbol_short!("COV_NEW"), id, owner);
        Ok(id)
    }

    pub fn get_covid_record(
        env: Env,
        caller: Address,
        record_id: u64,
    ) -> Result<CovidVaccinationRecord, ContractError> {
        caller.require_auth();
        Self::load_covid(&env, &caller, record_id)
    }

    pub fn list_covid_records(env: Env, owner: Address) -> Vec<CovidVaccinationRecord> {
        owner.require_auth();
        Self::live_covid(&env, &owner)
    }

    /// Replaces the record's details. When an NFT exists its metadata hash
    /// and token URI are recomputed.
    pub fn update_covid_record(
        env: Env,
        owner: Address,
        record_id: u64,
        details: VaccinationDetails,
        insurance_policy_id: u64,
        coverage_amount: Option<i128>,
    ) -> Result<CovidVaccinationRecord, ContractError> {
        Self::require_initialized(&env)?;
        owner.require_auth();
        let mut record = Self::load_covid(&env, &owner, record_id)?;
        details.validate()?;
        Self::validate_coverage(coverage_amount)?;
        Self::check_policy(&env, &owner, insurance_policy_id)?;

        if let Some(token_id) = record.nft.as_ref().map(|t| t.token_id) {
            let metadata = details::covid_nft_metadata(&env, record_id, &details);
            if let Some(updated) = nft::update_uri(&env, token_id, metadata) {
                record.nft = Some(updated);
            }
        }
        record.details = details;
        record.insurance_policy_id = insurance_policy_id;
        record.coverage_amount = coverage_amount;
        record.updated_at = env.ledger().timestamp();
        Self::save(&env, (COVID, record_id), &record);

        events::publish_record(&env, symbol_short!("COV_UPD"), record_id, owner);
        Ok(record)
    }

    pub fn delete_covid_record(env: Env, owner: Address, record_id: u64) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        owner.require_auth();
        let mut record = Self::load_covid(&env, &owner, record_id)?;

        let now = env.ledger().timestamp();
        record.deleted_at = Some(now);
        record.updated_at = now;
        Self::save(&env, (COVID, record_id), &record);

        events::publish_record(&env, symbol_short!("COV_DEL"), record_id, owner);
        Ok(())
    }

    pub fn covid_statistics(env: Env, owner: Address) -> CovidStatistics {
        owner.require_auth();
        let now = env.ledger().timestamp();
        let mut base = details::empty_statistics(&env);
        let mut nft_count: u32 = 0;
        let mut insurance_coverage: i128 = 0;
        for record in Self::live_covid(&env, &owner).iter() {
            details::tally(&mut base, &record.details, now);
            if record.nft.is_some() {
                nft_count = nft_count.saturating_add(1);
            }
            if let Some(amount) = record.coverage_amount {
                insurance_coverage = insurance_coverage.saturating_add(amount);
            }
        }
        CovidStatistics {
            total: base.total,
            completed: base.completed,
            pending: base.pending,
            vaccine_types: base.vaccine_types,
            nft_count,
            insurance_coverage,
        }
    }

    /// Linked to a policy with a non-zero coverage amount.
    pub fn is_covid_insured(env: Env, caller: Address, record_id: u64) -> Result<bool, ContractError> {
        caller.require_auth();
        let record = Self::load_covid(&env, &caller, record_id)?;
        Ok(matches!(record.coverage_amount, Some(amount) if amount != 0))
    }

    pub fn covid_blockchain_status(
        env: Env,
        caller: Address,
        record_id: u64,
    ) -> Result<BlockchainStatus, ContractError> {
        caller.require_auth();
        let record = Self::load_covid(&env, &caller, record_id)?;
        Ok(match record.nft {
            Some(_) => BlockchainStatus::Confirmed,
            None => BlockchainStatus::Pending,
        })
    }

    // ── Vaccination requests ────────────────────────────────────────────────

    pub fn submit_vaccination_request(
        env: Env,
        owner: Address,
        details: VaccinationDetails,
        insurance_policy_id: Option<u64>,
    ) -> Result<u64, ContractError> {
        Self::require_initialized(&env)?;
        owner.require_auth();
        details.validate()?;
        if let Some(policy_id) = insurance_policy_id {
            Self::check_policy(&env, &owner, policy_id)?;
        }

        let id = Self::next_id(&env, REQ_CTR);
        let now = env.ledger().timestamp();
        let request = VaccinationRequest {
            id,
            owner: owner.clone(),
            details,
            insurance_policy_id,
            status: RequestStatus::Pending,
            reviewed_by: None,
            nft: None,
            created_at: now,
            updated_at: now,
        };
        Self::save(&env, (REQUEST, id), &request);
        index::push(&env, &OWNER_REQUESTS, &IndexScope::Owner(owner.clone()), id);
        index::push(&env, &ALL_REQUESTS, &IndexScope::Global, id);

        events::publish_request_status(&env, id, owner, RequestStatus::Pending);
        Ok(id)
    }

    pub fn get_vaccination_request(
        env: Env,
        caller: Address,
        request_id: u64,
    ) -> Result<VaccinationRequest, ContractError> {
        caller.require_auth();
        let request = Self::load_request(&env, request_id)?;
        if request.owner != caller {
            return Err(ContractError::Unauthorized);
        }
        Ok(request)
    }

    pub fn list_vaccination_requests(env: Env, owner: Address) -> Vec<VaccinationRequest> {
        owner.require_auth();
        let ids = index::all(&env, &OWNER_REQUESTS, &IndexScope::Owner(owner));
        let mut out = Vec::new(&env);
        for id in ids.iter().rev() {
            if let Ok(request) = Self::load_request(&env, id) {
                out.push_back(request);
            }
        }
        out
    }

    /// Ids of requests awaiting review, oldest first.
    pub fn pending_requests(env: Env, reviewer: Address) -> Result<Vec<u64>, ContractError> {
        Self::require_admin(&env, &reviewer, AdminTier::ContractAdmin)?;
        let all = index::all(&env, &ALL_REQUESTS, &IndexScope::Global);
        let mut out = Vec::new(&env);
        for id in all.iter() {
            if let Ok(request) = Self::load_request(&env, id) {
                if request.status == RequestStatus::Pending {
                    out.push_back(id);
                }
            }
        }
        Ok(out)
    }

    pub fn approve_request(env: Env, reviewer: Address, request_id: u64) -> Result<(), ContractError> {
        Self::transition(&env, &reviewer, request_id, RequestStatus::Approved)?;
        Ok(())
    }

    pub fn reject_request(env: Env, reviewer: Address, request_id: u64) -> Result<(), ContractError> {
        Self::transition(&env, &reviewer, request_id, RequestStatus::Rejected)?;
        Ok(())
    }

    /// Marks an approved request as administered and mints its NFT.
    pub fn complete_request(env: Env, reviewer: Address, request_id: u64) -> Result<NftRef, ContractError> {
        let mut request = Self::transition(&env, &reviewer, request_id, RequestStatus::Completed)?;

        let metadata = details::covid_nft_metadata(&env, request_id, &request.details);
        let token = nft::mint(&env, &request.owner, metadata);
        request.nft = Some(token.clone());
        Self::save(&env, (REQUEST, request_id), &request);
        Ok(token)
    }

    pub fn get_nft(env: Env, token_id: u64) -> Option<nft::NftToken> {
        nft::get(&env, token_id)
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

    fn check_policy(env: &Env, owner: &Address, policy_id: u64) -> Result<(), ContractError> {
        let insurance: Address = env
            .storage()
            .instance()
            .get(&INSURANCE)
            .ok_or(ContractError::InsuranceNotConfigured)?;
        match InsuranceClient::new(env, &insurance).policy_owner(&policy_id) {
            None => Err(ContractError::PolicyNotFound),
            Some(policy_owner) if policy_owner != *owner => Err(ContractError::Unauthorized),
            Some(_) => Ok(()),
        }
    }

    fn validate_coverage(coverage_amount: Option<i128>) -> Result<(), ContractError> {
        if matches!(coverage_amount, Some(amount) if amount < 0) {
            return Err(ContractError::InvalidInput);
        }
        Ok(())
    }

    /// Pending → Approved → Completed; Pending or Approved → Rejected.
    fn transition(
        env: &Env,
        reviewer: &Address,
        request_id: u64,
        to: RequestStatus,
    ) -> Result<VaccinationRequest, ContractError> {
        Self::require_initialized(env)?;
        Self::require_admin(env, reviewer, AdminTier::ContractAdmin)?;
        let mut request = Self::load_request(env, request_id)?;

        let allowed = matches!(
            (&request.status, &to),
            (RequestStatus::Pending, RequestStatus::Approved)
                | (RequestStatus::Pending, RequestStatus::Rejected)
                | (RequestStatus::Approved, RequestStatus::Rejected)
                | (RequestStatus::Approved, RequestStatus::Completed)
        );
        if !allowed {
            return Err(ContractError::InvalidStatusTransition);
        }

        request.status = to.clone();
        request.reviewed_by = Some(reviewer.clone());
        request.updated_at = env.ledger().timestamp();
        Self::save(env, (REQUEST, request_id), &request);

        events::publish_request_status(env, request_id, request.owner.clone(), to);
        Ok(request)
    }

    fn next_id(env: &Env, counter: Symbol) -> u64 {
        let id: u64 = env
            .storage()
            .instance()
            .get(&counter)
            .unwrap_or(0u64)
            .saturating_add(1);
        env.storage().instance().set(&counter, &id);
        id
    }

    fn save<V>(env: &Env, key: (Symbol, u64), value: &V)
    where
        V: soroban_sdk::IntoVal<Env, soroban_sdk::Val>,
    {
        env.storage().persistent().set(&key, value);
        ttl::extend_persistent(env, &key);
    }

    fn load_vaccination(env: &Env, caller: &Address, record_id: u64) -> Result<VaccinationRecord, ContractError> {
        let record: VaccinationRecord = env
            .storage()
            .persistent()
            .get(&(VACCINATION, record_id))
            .ok_or(ContractError::RecordNotFound)?;
        if record.deleted_at.is_some() {
            return Err(ContractError::RecordNotFound);
        }
        if record.owner != *caller {
            return Err(ContractError::Unauthorized);
        }
        Ok(record)
    }

    fn load_covid(env: &Env, caller: &Address, record_id: u64) -> Result<CovidVaccinationRecord, ContractError> {
        let record: CovidVaccinationRecord = env
            .storage()
            .persistent()
            .get(&(COVID, record_id))
            .ok_or(ContractError::RecordNotFound)?;
        if record.deleted_at.is_some() {
            return Err(ContractError::RecordNotFound);
        }
        if record.owner != *caller {
            return Err(ContractError::Unauthorized);
        }
        Ok(record)
    }

    fn load_request(env: &Env, request_id: u64) -> Result<VaccinationRequest, ContractError> {
        env.storage()
            .persistent()
            .get(&(REQUEST, request_id))
            .ok_or(ContractError::RequestNotFound)
    }

    fn live_vaccinations(env: &Env, owner: &Address) -> Vec<VaccinationRecord> {
        let mut out = Vec::new(env);
        for id in index::all(env, &OWNER_VACCINATIONS, &IndexScope::Owner(owner.clone())).iter().rev() {
            if let Ok(record) = Self::load_vaccination(env, owner, id) {
                out.push_back(record);
            }
        }
        out
    }

    fn live_covid(env: &Env, owner: &Address) -> Vec<CovidVaccinationRecord> {
        let mut out = Vec::new(env);
        for id in index::all(env, &OWNER_COVID, &IndexScope::Owner(owner.clone())).iter().rev() {
            if let Ok(record) = Self::load_covid(env, owner, id) {
                out.push_back(record);
            }
        }
        out
    }
}
