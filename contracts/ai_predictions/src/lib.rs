#![no_std]

pub mod errors;
pub mod events;
pub mod risk;


use common::{
    admin_tiers::{self, AdminTier},
    index::{self, IndexScope},
    nft::{self, NftMetadata, NftRef},
    rate_limit::{self, RateLimiterConfig},
    text, ttl, ComplianceCounts, HealthRecordsClient, SECONDS_PER_DAY,
};
use soroban_sdk::{
    contract, contractimpl, contracttype, symbol_short, Address, Env, Map, String, Symbol, Vec,
};

pub use errors::ContractError;
pub use risk::RiskLevel;

// ── Storage keys ─────────────────────────────────────────────────────────────

const INITIALIZED: Symbol = symbol_short!("INIT");
const HEALTH_RECORDS: Symbol = symbol_short!("HR_ADDR");
const OPERATOR: Symbol = symbol_short!("OPERATOR");
const REQ_CTR: Symbol = symbol_short!("REQ_CTR");
const REQUEST: Symbol = symbol_short!("REQUEST");
const OWNER_REQUESTS: Symbol = symbol_short!("OWN_REQ");
const PRED_CTR: Symbol = symbol_short!("PRED_CTR");
const PREDICTION: Symbol = symbol_short!("PRED");
const OWNER_PREDICTIONS: Symbol = symbol_short!("OWN_PRED");
const SYM_CTR: Symbol = symbol_short!("SYM_CTR");
const SYMPTOM: Symbol = symbol_short!("SYMPTOM");
const OWNER_SYMPTOMS: Symbol = symbol_short!("OWN_SYM");

const MAX_TEXT_LEN: u32 = 255;
const RECENT_WINDOW_DAYS: u64 = 30;

// ── Types ────────────────────────────────────────────────────────────────────

/// An off-chain inference service allowed to write results back.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AiOperator {
    pub operator: Address,
    pub name: String,
    pub model_version: String,
    pub active: bool,
    pub registered_at: u64,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RequestStatus {
    Open,
    Fulfilled,
    Failed,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PredictionRequest {
    pub id: u64,
    pub owner: Address,
    pub health_record_id: u64,
    pub prediction_type: String,
    pub status: RequestStatus,
    pub prediction_id: Option<u64>,
    pub created_at: u64,
    pub updated_at: u64,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PredictionStatus {
    Pending,
    Completed,
    Ignored,
}

/// What an operator reports for a request. Scores are basis points.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PredictionOutput {
    pub prediction_result: Map<String, String>,
    pub confidence_bps: u32,
    pub risk_score_bps: u32,
    pub input_parameters: Map<String, String>,
    pub recommendations: Vec<String>,
    pub risk_factors: Vec<String>,
    pub next_checkup_date: Option<u64>,
    pub model_metadata: Map<String, String>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AiHealthPrediction {
    pub id: u64,
    pub owner: Address,
    pub health_record_id: u64,
    pub prediction_type: String,
    pub prediction_result: Map<String, String>,
    pub confidence_bps: u32,
    pub risk_score_bps: u32,
    pub risk_level: RiskLevel,
    pub input_parameters: Map<String, String>,
    pub model_version: String,
    pub recommendations: Vec<String>,
    pub risk_factors: Vec<String>,
    pub next_checkup_date: u64,
    pub model_metadata: Map<String, String>,
    pub status: PredictionStatus,
    pub nft: Option<NftRef>,
    pub created_at: u64,
    pub updated_at: u64,
    pub deleted_at: Option<u64>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SymptomRecord {
    pub id: u64,
    pub owner: Address,
    pub symptoms: String,
    pub notes: Option<String>,
    pub ai_diagnosis: Vec<String>,
    pub recommendations: Vec<String>,
    pub confidence_bps: Option<u32>,
    pub requires_medical_attention: bool,
    pub analyzed_at: Option<u64>,
    pub created_at: u64,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct AiPredictionsContract;

#[contractimpl]
impl AiPredictionsContract {
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

    pub fn set_health_records(
        env: Env,
        caller: Address,
        health_records: Address,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        Self::require_admin(&env, &caller, AdminTier::ContractAdmin)?;
        env.storage().instance().set(&HEALTH_RECORDS, &health_records);
        ttl::extend_instance(&env);
        Ok(())
    }

    pub fn get_health_records(env: Env) -> Option<Address> {
        env.storage().instance().get(&HEALTH_RECORDS)
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

    // ── Operators ───────────────────────────────────────────────────────────

    pub fn register_operator(
        env: Env,
        caller: Address,
        operator: Address,
        name: String,
        model_version: String,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        Self::require_admin(&env, &caller, AdminTier::OperatorAdmin)?;
        Self::validate_text(&name)?;
        Self::validate_text(&model_version)?;

        let key = (OPERATOR, operator.clone());
        if env.storage().persistent().has(&key) {
            return Err(ContractError::OperatorAlreadyRegistered);
        }
        let record = AiOperator {
            operator: operator.clone(),
            name,
            model_version,
            active: true,
            registered_at: env.ledger().timestamp(),
        };
        env.storage().persistent().set(&key, &record);
        ttl::extend_persistent(&env, &key);

        events::publish_operator(&env, operator, true);
        Ok(())
    }

    pub fn set_operator_active(
        env: Env,
        caller: Address,
        operator: Address,
        active: bool,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        Self::require_admin(&env, &caller, AdminTier::OperatorAdmin)?;

        let key = (OPERATOR, operator.clone());
        let mut record: AiOperator = env
            .storage()
            .persistent()
            .get(&key)
            .ok_or(ContractError::OperatorNotFound)?;
        record.active = active;
        env.storage().persistent().set(&key, &record);
        ttl::extend_persistent(&env, &key);

        events::publish_operator(&env, operator, active);
        Ok(())
    }

    pub fn get_operator(env: Env, operator: Address) -> Result<AiOperator, ContractError> {
        env.storage()
            .persistent()
            .get(&(OPERATOR, operator))
            .ok_or(ContractError::OperatorNotFound)
    }

    // ── Prediction requests ─────────────────────────────────────────────────

    /// Files a prediction request against one of the owner's health records.
    /// An operator picks it up off-chain and answers through
    /// `fulfil_prediction` or `fail_request`.
    pub fn request_prediction(
        env: Env,
        owner: Address,
        health_record_id: u64,
        prediction_type: String,
    ) -> Result<u64, ContractError> {
        Self::require_initialized(&env)?;
        owner.require_auth();
        Self::validate_text(&prediction_type)?;
        Self::require_record_owner(&env, &owner, health_record_id)?;

        let id = Self::next_id(&env, &REQ_CTR);
        let now = env.ledger().timestamp();
        let request = PredictionRequest {
            id,
            owner: owner.clone(),
            health_record_id,
            prediction_type: prediction_type.clone(),
            status: RequestStatus::Open,
            prediction_id: None,
            created_at: now,
            updated_at: now,
        };
        Self::save(&env, (REQUEST, id), &request);
        Self::index(&env, (OWNER_REQUESTS, owner.clone()), id);

        events::publish_request(
            &env,
            id,
            owner,
            health_record_id,
            prediction_type,
            RequestStatus::Open,
        );
        Ok(id)
    }

    pub fn get_prediction_request(
        env: Env,
        caller: Address,
        request_id: u64,
    ) -> Result<PredictionRequest, ContractError> {
        caller.require_auth();
        let request = Self::load_request(&env, request_id)?;
        if request.owner != caller {
            return Err(ContractError::Unauthorized);
        }
        Ok(request)
    }

    /// The owner's requests, newest first.
    pub fn list_prediction_requests(env: Env, owner: Address) -> Vec<PredictionRequest> {
        owner.require_auth();
        let ids = Self::ids(&env, (OWNER_REQUESTS, owner));
        let mut out = Vec::new(&env);
        for id in ids.iter().rev() {
            if let Some(request) = env.storage().persistent().get(&(REQUEST, id)) {
                out.push_back(request);
            }
        }
        out
    }

    /// Records the model output for an open request as a new `Pending`
    /// prediction. Returns the prediction id.
    pub fn fulfil_prediction(
        env: Env,
        operator: Address,
        request_id: u64,
        output: PredictionOutput,
    ) -> Result<u64, ContractError> {
        Self::require_initialized(&env)?;
        let op = Self::require_operator(&env, &operator)?;
        let mut request = Self::load_request(&env, request_id)?;
        if request.status != RequestStatus::Open {
            return Err(ContractError::InvalidStatusTransition);
        }
        if output.confidence_bps > risk::MAX_BPS || output.risk_score_bps > risk::MAX_BPS {
            return Err(ContractError::InvalidInput);
        }

        let id = Self::next_id(&env, &PRED_CTR);
        let now = env.ledger().timestamp();
        let next_checkup_date = output
            .next_checkup_date
            .unwrap_or_else(|| risk::default_next_checkup(now, output.risk_score_bps));
        let prediction = AiHealthPrediction {
            id,
            owner: request.owner.clone(),
            health_record_id: request.health_record_id,
            prediction_type: request.prediction_type.clone(),
            prediction_result: output.prediction_result,
            confidence_bps: output.confidence_bps,
            risk_score_bps: output.risk_score_bps,
            risk_level: risk::risk_level(output.risk_score_bps),
            input_parameters: output.input_parameters,
            model_version: op.model_version,
            recommendations: output.recommendations,
            risk_factors: output.risk_factors,
            next_checkup_date,
            model_metadata: output.model_metadata,
            status: PredictionStatus::Pending,
            nft: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        Self::save(&env, (PREDICTION, id), &prediction);
        Self::index(&env, (OWNER_PREDICTIONS, request.owner.clone()), id);

        request.status = RequestStatus::Fulfilled;
        request.prediction_id = Some(id);
        request.updated_at = now;
        Self::save(&env, (REQUEST, request_id), &request);

        events::publish_request(
            &env,
            request_id,
            request.owner.clone(),
            request.health_record_id,
            request.prediction_type,
            RequestStatus::Fulfilled,
        );
        events::publish_prediction(&env, symbol_short!("PRED_NEW"), id, request.owner);
        Ok(id)
    }

    /// Marks an open request as failed when inference could not be run.
    pub fn fail_request(env: Env, operator: Address, request_id: u64) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        Self::require_operator(&env, &operator)?;
        let mut request = Self::load_request(&env, request_id)?;
        if request.status != RequestStatus::Open {
            return Err(ContractError::InvalidStatusTransition);
        }

        request.status = RequestStatus::Failed;
        request.updated_at = env.ledger().timestamp();
        Self::save(&env, (REQUEST, request_id), &request);

        events::publish_request(
            &env,
            request_id,
            request.owner,
            request.health_record_id,
            request.prediction_type,
            RequestStatus::Failed,
        );
        Ok(())
    }

    // ── Predictions ─────────────────────────────────────────────────────────

    pub fn get_prediction(
        env: Env,
        caller: Address,
        prediction_id: u64,
    ) -> Result<AiHealthPrediction, ContractError> {
        caller.require_auth();
        Self::load_owned(&env, &caller, prediction_id)
    }

    /// The owner's live predictions, newest first.
    pub fn list_predictions(env: Env, owner: Address) -> Vec<AiHealthPrediction> {
        owner.require_auth();
        Self::live_predictions(&env, &owner)
    }

    /// Re-points the prediction at another of the owner's records, renames
    /// its type, or sets its status.
    pub fn update_prediction(
        env: Env,
        owner: Address,
        prediction_id: u64,
        health_record_id: u64,
        prediction_type: String,
        status: PredictionStatus,
    ) -> Result<AiHealthPrediction, ContractError> {
        Self::require_initialized(&env)?;
        owner.require_auth();
        let mut prediction = Self::load_owned(&env, &owner, prediction_id)?;
        Self::validate_text(&prediction_type)?;
        if health_record_id != prediction.health_record_id {
            Self::require_record_owner(&env, &owner, health_record_id)?;
        }

        prediction.health_record_id = health_record_id;
        prediction.prediction_type = prediction_type;
        prediction.status = status;
        prediction.updated_at = env.ledger().timestamp();
        Self::save(&env, (PREDICTION, prediction_id), &prediction);

        events::publish_prediction(&env, symbol_short!("PRED_UPD"), prediction_id, owner);
        Ok(prediction)
    }

    pub fn delete_prediction(env: Env, owner: Address, prediction_id: u64) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        owner.require_auth();
        let mut prediction = Self::load_owned(&env, &owner, prediction_id)?;

        let now = env.ledger().timestamp();
        prediction.deleted_at = Some(now);
        prediction.updated_at = now;
        Self::save(&env, (PREDICTION, prediction_id), &prediction);

        events::publish_prediction(&env, symbol_short!("PRED_DEL"), prediction_id, owner);
        Ok(())
    }

    /// Predictions with confidence of at least 80 %.
    pub fn high_risk_predictions(env: Env, owner: Address) -> Vec<AiHealthPrediction> {
        owner.require_auth();
        let mut out = Vec::new(&env);
        for p in Self::live_predictions(&env, &owner).iter() {
            if p.confidence_bps >= risk::HIGH_CONFIDENCE_BPS {
                out.push_back(p);
            }
        }
        out
    }

    /// Predictions created in the last 30 days.
    pub fn recent_predictions(env: Env, owner: Address) -> Vec<AiHealthPrediction> {
        owner.require_auth();
        let since = env
            .ledger()
            .timestamp()
            .saturating_sub(RECENT_WINDOW_DAYS * SECONDS_PER_DAY);
        let mut out = Vec::new(&env);
        for p in Self::live_predictions(&env, &owner).iter() {
            if p.created_at >= since {
                out.push_back(p);
            }
        }
        out
    }

    /// Totals over the owner's live predictions created at or after `since`.
    pub fn compliance_counts(env: Env, owner: Address, since: u64) -> ComplianceCounts {
        let mut counts = ComplianceCounts::default();
        for p in Self::live_predictions(&env, &owner).iter() {
            if p.created_at < since {
                continue;
            }
            counts.total = counts.total.saturating_add(1);
            if p.status == PredictionStatus::Completed {
                counts.completed = counts.completed.saturating_add(1);
            }
        }
        counts
    }

    /// Mints the prediction's NFT. Rate-limited per owner.
    pub fn generate_prediction_nft(
        env: Env,
        owner: Address,
        prediction_id: u64,
    ) -> Result<NftRef, ContractError> {
        Self::require_initialized(&env)?;
        owner.require_auth();
        let mut prediction = Self::load_owned(&env, &owner, prediction_id)?;
        if prediction.nft.is_some() {
            return Err(ContractError::AlreadyMinted);
        }
        if !rate_limit::enforce(&env, &owner) {
            return Err(ContractError::RateLimitExceeded);
        }

        let token = nft::mint(&env, &owner, Self::nft_metadata(&env, &prediction));
        prediction.nft = Some(token.clone());
        prediction.updated_at = env.ledger().timestamp();
        Self::save(&env, (PREDICTION, prediction_id), &prediction);

        events::publish_prediction(&env, symbol_short!("PRED_NFT"), prediction_id, owner);
        Ok(token)
    }

    pub fn get_nft(env: Env, token_id: u64) -> Option<nft::NftToken> {
        nft::get(&env, token_id)
    }

    // ── Symptom checker ─────────────────────────────────────────────────────

    pub fn submit_symptoms(
        env: Env,
        owner: Address,
        symptoms: String,
        notes: Option<String>,
    ) -> Result<u64, ContractError> {
        Self::require_initialized(&env)?;
        owner.require_auth();
        if symptoms.is_empty() {
            return Err(ContractError::InvalidInput);
        }

        let id = Self::next_id(&env, &SYM_CTR);
        let record = SymptomRecord {
            id,
            owner: owner.clone(),
            symptoms,
            notes,
            ai_diagnosis: Vec::new(&env),
            recommendations: Vec::new(&env),
            confidence_bps: None,
            requires_medical_attention: false,
            analyzed_at: None,
            created_at: env.ledger().timestamp(),
        };
        Self::save(&env, (SYMPTOM, id), &record);
        Self::index(&env, (OWNER_SYMPTOMS, owner.clone()), id);

        events::publish_symptom(&env, symbol_short!("SYM_NEW"), id, owner, false);
        Ok(id)
    }

    pub fn store_symptom_analysis(
        env: Env,
        operator: Address,
        symptom_id: u64,
        diagnosis: Vec<String>,
        recommendations: Vec<String>,
        confidence_bps: u32,
        requires_medical_attention: bool,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        Self::require_operator(&env, &operator)?;
        if confidence_bps > risk::MAX_BPS {
            return Err(ContractError::InvalidInput);
        }
        let mut record: SymptomRecord = env
            .storage()
            .persistent()
            .get(&(SYMPTOM, symptom_id))
            .ok_or(ContractError::SymptomRecordNotFound)?;
        if record.analyzed_at.is_some() {
            return Err(ContractError::InvalidStatusTransition);
        }

        record.ai_diagnosis = diagnosis;
        record.recommendations = recommendations;
        record.confidence_bps = Some(confidence_bps);
        record.requires_medical_attention = requires_medical_attention;
        record.analyzed_at = Some(env.ledger().timestamp());
        Self::save(&env, (SYMPTOM, symptom_id), &record);

        events::publish_symptom(
            &env,
            symbol_short!("SYM_DONE"),
            symptom_id,
            record.owner,
            requires_medical_attention,
        );
        Ok(())
    }

    pub fn get_symptom_record(
        env: Env,
        caller: Address,
        symptom_id: u64,
    ) -> Result<SymptomRecord, ContractError> {
        caller.require_auth();
        let record: SymptomRecord = env
            .storage()
            .persistent()
            .get(&(SYMPTOM, symptom_id))
            .ok_or(ContractError::SymptomRecordNotFound)?;
        if record.owner != caller {
            return Err(ContractError::Unauthorized);
        }
        Ok(record)
    }

    /// The owner's symptom checks, newest first.
    pub fn symptom_history(env: Env, owner: Address) -> Vec<SymptomRecord> {
        owner.require_auth();
        let ids = Self::ids(&env, (OWNER_SYMPTOMS, owner));
        let mut out = Vec::new(&env);
        for id in ids.iter().rev() {
            if let Some(record) = env.storage().persistent().get(&(SYMPTOM, id)) {
                out.push_back(record);
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

    fn require_operator(env: &Env, operator: &Address) -> Result<AiOperator, ContractError> {
        operator.require_auth();
        let record: AiOperator = env
            .storage()
            .persistent()
            .get(&(OPERATOR, operator.clone()))
            .ok_or(ContractError::Unauthorized)?;
        if !record.active {
            return Err(ContractError::OperatorInactive);
        }
        Ok(record)
    }

    fn require_record_owner(env: &Env, owner: &Address, record_id: u64) -> Result<(), ContractError> {
        let address: Address = env
            .storage()
            .instance()
            .get(&HEALTH_RECORDS)
            .ok_or(ContractError::HealthRecordsNotConfigured)?;
        let record_owner = HealthRecordsClient::new(env, &address)
            .record_owner(&record_id)
            .ok_or(ContractError::HealthRecordNotFound)?;
        if record_owner != *owner {
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

    fn status_label(env: &Env, status: PredictionStatus) -> String {
        String::from_str(
            env,
            match status {
                PredictionStatus::Pending => "pending",
                PredictionStatus::Completed => "completed",
                PredictionStatus::Ignored => "ignored",
            },
        )
    }

    fn nft_metadata(env: &Env, prediction: &AiHealthPrediction) -> NftMetadata {
        let mut attributes = Vec::new(env);
        attributes.push_back(nft::attribute(
            env,
            "Prediction Type",
            prediction.prediction_type.clone(),
        ));
        attributes.push_back(nft::attribute(
            env,
            "Confidence Score (bps)",
            text::u64_to_string(env, u64::from(prediction.confidence_bps)),
        ));
        attributes.push_back(nft::attribute(
            env,
            "Model Version",
            prediction.model_version.clone(),
        ));
        attributes.push_back(nft::attribute(
            env,
            "Status",
            Self::status_label(env, prediction.status),
        ));
        NftMetadata {
            name: text::prefixed_id(env, "AI Health Prediction #", prediction.id, 0),
            description: String::from_str(env, "AI-generated health prediction"),
            image: String::from_str(env, ""),
            attributes,
        }
    }

    fn next_id(env: &Env, counter: &Symbol) -> u64 {
        let id: u64 = env
            .storage()
            .instance()
            .get(counter)
            .unwrap_or(0u64)
            .saturating_add(1);
        env.storage().instance().set(counter, &id);
        id
    }

    fn save<V: soroban_sdk::IntoVal<Env, soroban_sdk::Val>>(env: &Env, key: (Symbol, u64), value: &V) {
        env.storage().persistent().set(&key, value);
        ttl::extend_persistent(env, &key);
    }

    fn ids(env: &Env, (name, owner): (Symbol, Address)) -> Vec<u64> {
        index::all(env, &name, &IndexScope::Owner(owner))
    }

    fn index(env: &Env, (name, owner): (Symbol, Address), id: u64) {
        index::push(env, &name, &IndexScope::Owner(owner), id);
    }

    fn load_request(env: &Env, request_id: u64) -> Result<PredictionRequest, ContractError> {
        env.storage()
            .persistent()
            .get(&(REQUEST, request_id))
            .ok_or(ContractError::RequestNotFound)
    }

    fn load_live(env: &Env, prediction_id: u64) -> Option<AiHealthPrediction> {
        let prediction: AiHealthPrediction =
            env.storage().persistent().get(&(PREDICTION, prediction_id))?;
        if prediction.deleted_at.is_some() {
            return None;
        }
        Some(prediction)
    }

    fn load_owned(
        env: &Env,
        caller: &Address,
        prediction_id: u64,
    ) -> Result<AiHealthPrediction, ContractError> {
        let prediction =
            Self::load_live(env, prediction_id).ok_or(ContractError::PredictionNotFound)?;
        if prediction.owner != *caller {
            return Err(ContractError::Unauthorized);
        }
        Ok(prediction)
    }

    fn live_predictions(env: &Env, owner: &Address) -> Vec<AiHealthPrediction> {
        let ids = Self::ids(env, (OWNER_PREDICTIONS, owner.clone()));
        let mut out = Vec::new(env);
        for id in ids.iter().rev() {
            if let Some(prediction) = Self::load_live(env, id) {
                out.push_back(prediction);
            }
        }
        out
    }
}
