#![no_std]

pub mod errors;
pub mod events;

#[cfg(test)]
mod test;

use common::{
    admin_tiers::{self, AdminTier},
    index::{self, IndexScope},
    nft::{self, NftMetadata, NftRef},
    rate_limit::{self, RateLimiterConfig},
    text, ttl,
};
use soroban_sdk::{
    contract, contractimpl, contracttype, symbol_short, Address, Env, Map, String, Symbol, Vec,
};

pub use errors::ContractError;

// ── Storage keys ─────────────────────────────────────────────────────────────

const INITIALIZED: Symbol = symbol_short!("INIT");
const REC_CTR: Symbol = symbol_short!("REC_CTR");
const RECORD: Symbol = symbol_short!("RECORD");
const OWNER_RECORDS: Symbol = symbol_short!("OWN_REC");
const DEV_CTR: Symbol = symbol_short!("DEV_CTR");
const READING: Symbol = symbol_short!("READING");
const OWNER_READINGS: Symbol = symbol_short!("OWN_DEV");

const MAX_TEXT_LEN: u32 = 255;
const MAX_HEALTH_SCORE: u32 = 100;
const MAX_AGE: u32 = 150;

// ── Types ────────────────────────────────────────────────────────────────────

/// Vital signs captured with a record. Fractional measurements are stored
/// scaled by ten (`bmi_x10 = 247` is a BMI of 24.7).
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Vitals {
    pub age: u32,
    pub gender: String,
    pub bmi_x10: u32,
    pub blood_pressure_systolic: u32,
    pub blood_pressure_diastolic: u32,
    pub heart_rate: u32,
    pub temperature_x10: u32,
    pub oxygen_saturation: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HealthRecord {
    pub id: u64,
    pub owner: Address,
    pub ipfs_hash: String,
    pub encryption_key: String,
    pub metadata: Map<String, String>,
    pub vitals: Option<Vitals>,
    pub health_score: Option<u32>,
    pub nft: Option<NftRef>,
    pub created_at: u64,
    pub updated_at: u64,
    pub deleted_at: Option<u64>,
}

/// A single reading pushed by a wearable or home device.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DeviceReading {
    pub id: u64,
    pub owner: Address,
    pub device_id: String,
    pub device_type: String,
    pub data: Map<String, String>,
    pub recorded_at: u64,
    pub created_at: u64,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct HealthRecordsContract;

#[contractimpl]
impl HealthRecordsContract {
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

    /// Sets the NFT minting rate limit. A zero field disables limiting.
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

    // ── Health records ──────────────────────────────────────────────────────

    pub fn create_record(
        env: Env,
        owner: Address,
        ipfs_hash: String,
        encryption_key: String,
        metadata: Map<String, String>,
        vitals: Option<Vitals>,
        health_score: Option<u32>,
    ) -> Result<u64, ContractError> {
        Self::require_initialized(&env)?;
        owner.require_auth();
        Self::validate_record(&ipfs_hash, &encryption_key, &vitals, health_score)?;

        let id: u64 = env
            .storage()
            .instance()
            .get(&REC_CTR)
            .unwrap_or(0u64)
            .saturating_add(1);
        env.storage().instance().set(&REC_CTR, &id);

        let now = env.ledger().timestamp();
        let record = HealthRecord {
            id,
            owner: owner.clone(),
            ipfs_hash,
            encryption_key,
            metadata,
            vitals,
            health_score,
            nft: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        Self::save_record(&env, &record);
        index::push(&env, &OWNER_RECORDS, &IndexScope::Owner(owner.clone()), id);

        events::publish_record_created(&env, id, owner);
        Ok(id)
    }

    pub fn get_record(env: Env, caller: Address, record_id: u64) -> Result<HealthRecord, ContractError> {
        caller.require_auth();
        Self::load_owned(&env, &caller, record_id)
    }

    /// The owner's live records, newest first.
    pub fn list_records(env: Env, owner: Address) -> Vec<HealthRecord> {
        owner.require_auth();
        Self::live_records(&env, &owner)
    }

    /// Replaces the record's content. The NFT reference is kept.
    pub fn update_record(
        env: Env,
        owner: Address,
        record_id: u64,
        ipfs_hash: String,
        encryption_key: String,
        metadata: Map<String, String>,
        vitals: Option<Vitals>,
        health_score: Option<u32>,
    ) -> Result<HealthRecord, ContractError> {
        Self::require_initialized(&env)?;
        owner.require_auth();
        let mut record = Self::load_owned(&env, &owner, record_id)?;
        Self::validate_record(&ipfs_hash, &encryption_key, &vitals, health_score)?;

        record.ipfs_hash = ipfs_hash;
        record.encryption_key = encryption_key;
        record.metadata = metadata;
        record.vitals = vitals;
        record.health_score = health_score;
        record.updated_at = env.ledger().timestamp();
        Self::save_record(&env, &record);

        events::publish_record_updated(&env, record_id, owner);
        Ok(record)
    }

    /// Soft-deletes the record and burns its NFT, if any.
    pub fn delete_record(env: Env, owner: Address, record_id: u64) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        owner.require_auth();
        let mut record = Self::load_owned(&env, &owner, record_id)?;

        if let Some(token) = &record.nft {
            nft::burn(&env, token.token_id);
        }
        let now = env.ledger().timestamp();
        record.deleted_at = Some(now);
        record.updated_at = now;
        Self::save_record(&env, &record);

        events::publish_record_deleted(&env, record_id, owner);
        Ok(())
    }

    /// Mints the record's NFT. Rate-limited per owner.
    pub fn mint_record_nft(env: Env, owner: Address, record_id: u64) -> Result<NftRef, ContractError> {
        Self::require_initialized(&env)?;
        owner.require_auth();
        let mut record = Self::load_owned(&env, &owner, record_id)?;
        if record.nft.is_some() {
            return Err(ContractError::AlreadyMinted);
        }
        if !rate_limit::enforce(&env, &owner) {
            return Err(ContractError::RateLimitExceeded);
        }

        let token = nft::mint(&env, &owner, Self::nft_metadata(&env, &record));
        record.nft = Some(token.clone());
        record.updated_at = env.ledger().timestamp();
        Self::save_record(&env, &record);

        events::publish_nft_minted(
            &env,
            record_id,
            owner,
            token.token_id,
            token.ipfs_hash.clone(),
        );
        Ok(token)
    }

    pub fn get_nft(env: Env, token_id: u64) -> Option<nft::NftToken> {
        nft::get(&env, token_id)
    }

    // ── Cross-contract views ────────────────────────────────────────────────

    pub fn record_owner(env: Env, record_id: u64) -> Option<Address> {
        Self::load_live(&env, record_id).map(|r| r.owner)
    }

    pub fn latest_health_score(env: Env, owner: Address) -> u32 {
        Self::live_records(&env, &owner)
            .first()
            .and_then(|r| r.health_score)
            .unwrap_or(0)
    }

    // ── IoT device data ─────────────────────────────────────────────────────

    pub fn record_device_data(
        env: Env,
        owner: Address,
        device_id: String,
        device_type: String,
        data: Map<String, String>,
        recorded_at: u64,
    ) -> Result<u64, ContractError> {
        Self::require_initialized(&env)?;
        owner.require_auth();
        Self::validate_text(&device_id)?;
        Self::validate_text(&device_type)?;
        if data.is_empty() {
            return Err(ContractError::InvalidInput);
        }

        let id: u64 = env
            .storage()
            .instance()
            .get(&DEV_CTR)
            .unwrap_or(0u64)
            .saturating_add(1);
        env.storage().instance().set(&DEV_CTR, &id);

        let reading = DeviceReading {
            id,
            owner: owner.clone(),
            device_id: device_id.clone(),
            device_type,
            data,
            recorded_at,
            created_at: env.ledger().timestamp(),
        };
        let key = (READING, id);
        env.storage().persistent().set(&key, &reading);
        ttl::extend_persistent(&env, &key);
        index::push(&env, &OWNER_READINGS, &IndexScope::Owner(owner.clone()), id);

        events::publish_device_data(&env, id, owner, device_id);
        Ok(id)
    }

    /// The owner's device readings, newest first.
    pub fn list_device_data(env: Env, owner: Address) -> Vec<DeviceReading> {
        owner.require_auth();
        let ids = index::all(&env, &OWNER_READINGS, &IndexScope::Owner(owner));
        let mut out = Vec::new(&env);
        for id in ids.iter().rev() {
            if let Some(reading) = env.storage().persistent().get::<_, DeviceReading>(&(READING, id)) {
                out.push_back(reading);
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

    fn validate_text(value: &String) -> Result<(), ContractError> {
        if value.is_empty() || value.len() > MAX_TEXT_LEN {
            return Err(ContractError::InvalidInput);
        }
        Ok(())
    }

    fn validate_record(
        ipfs_hash: &String,
        encryption_key: &String,
        vitals: &Option<Vitals>,
        health_score: Option<u32>,
    ) -> Result<(), ContractError> {
        Self::validate_text(ipfs_hash)?;
        Self::validate_text(encryption_key)?;
        if let Some(score) = health_score {
            if score > MAX_HEALTH_SCORE {
                return Err(ContractError::InvalidHealthScore);
            }
        }
        if let Some(v) = vitals {
            if v.age == 0 || v.age > MAX_AGE || v.oxygen_saturation > 100 {
                return Err(ContractError::InvalidVitals);
            }
        }
        Ok(())
    }

    fn nft_metadata(env: &Env, record: &HealthRecord) -> NftMetadata {
        let mut attributes = Vec::new(env);
        attributes.push_back(nft::attribute(
            env,
            "Record ID",
            text::u64_to_string(env, record.id),
        ));
        attributes.push_back(nft::attribute(env, "Content", record.ipfs_hash.clone()));
        if let Some(score) = record.health_score {
            attributes.push_back(nft::attribute(
                env,
                "Health Score",
                text::u64_to_string(env, u64::from(score)),
            ));
        }
        NftMetadata {
            name: text::prefixed_id(env, "Health Record #", record.id, 0),
            description: String::from_str(env, "Tokenized encrypted health record"),
            image: String::from_str(env, ""),
            attributes,
        }
    }

    fn save_record(env: &Env, record: &HealthRecord) {
        let key = (RECORD, record.id);
        env.storage().persistent().set(&key, record);
        ttl::extend_persistent(env, &key);
    }

    fn load_live(env: &Env, record_id: u64) -> Option<HealthRecord> {
        let record: HealthRecord = env.storage().persistent().get(&(RECORD, record_id))?;
        if record.deleted_at.is_some() {
            return None;
        }
        Some(record)
    }

    fn load_owned(env: &Env, caller: &Address, record_id: u64) -> Result<HealthRecord, ContractError> {
        let record = Self::load_live(env, record_id).ok_or(ContractError::RecordNotFound)?;
        if record.owner != *caller {
            return Err(ContractError::Unauthorized);
        }
        Ok(record)
    }

    fn live_records(env: &Env, owner: &Address) -> Vec<HealthRecord> {
        let ids = index::all(env, &OWNER_RECORDS, &IndexScope::Owner(owner.clone()));
        let mut out = Vec::new(env);
        for id in ids.iter().rev() {
            if let Some(record) = Self::load_live(env, id) {
                out.push_back(record);
            }
        }
        out
    }
}
