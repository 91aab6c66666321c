#![no_std]

pub mod errors;
pub mod events;
pub mod positions;
pub mod rewards;

#[cfg(test)]
mod test;

use common::{
    admin_tiers::{self, AdminTier},
    index::{self, IndexScope},
    rate_limit::{self, RateLimiterConfig},
    ttl, ComplianceCounts, HealthRecordsClient, PredictionsClient, SECONDS_PER_DAY,
};
use soroban_sdk::{
    contract, contractimpl, contracttype, symbol_short, Address, Env, Map, String, Symbol, Vec,
};

pub use errors::ContractError;
pub use positions::{PositionStatus, StakingPosition};

// ── Storage key constants ────────────────────────────────────────────────────

const INITIALIZED: Symbol = symbol_short!("INIT");
const HEALTH_RECORDS: Symbol = symbol_short!("HR_ADDR");
const PREDICTIONS: Symbol = symbol_short!("PRED_ADR");
const TOKEN_CTR: Symbol = symbol_short!("TOK_CTR");
const TOKEN: Symbol = symbol_short!("TOKEN");
const OWNER_TOKENS: Symbol = symbol_short!("OWN_TOK");
const TX_CTR: Symbol = symbol_short!("TX_CTR");
const TX: Symbol = symbol_short!("TX");
const TOKEN_TXS: Symbol = symbol_short!("TOK_TX");

const MAX_NAME_LEN: u32 = 255;
const MAX_SYMBOL_LEN: u32 = 10;

/// Look-back window for the compliance bonus.
const COMPLIANCE_WINDOW_DAYS: u64 = 90;

// ── Public-facing types ──────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TokenStatus {
    Active,
    Inactive,
    Paused,
}

/// A user's health token. Amounts are integer base units.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HealthToken {
    pub id: u64,
    pub owner: Address,
    pub name: String,
    pub symbol: String,
    pub network: String,
    pub balance: i128,
    pub staked_amount: i128,
    pub rewards_earned: i128,
    pub last_reward_calculation: u64,
    pub metadata: Map<String, String>,
    pub status: TokenStatus,
    pub created_at: u64,
    pub updated_at: u64,
    pub deleted_at: Option<u64>,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TransactionKind {
    Mint,
    Burn,
    Transfer,
    Stake,
    Unstake,
    Reward,
}

/// Ledger writes are atomic, so every stored transaction is `Completed`.
/// `Pending` and `Failed` are kept for clients that mirror off-chain
/// transaction state.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokenTransaction {
    pub id: u64,
    pub token_id: u64,
    pub kind: TransactionKind,
    pub amount: i128,
    pub from: Option<Address>,
    pub to: Option<Address>,
    pub status: TransactionStatus,
    pub created_at: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DataSources {
    pub health_records: Option<Address>,
    pub predictions: Option<Address>,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct HealthTokenContract;

#[contractimpl]
impl HealthTokenContract {
    // ── Initialisation ──────────────────────────────────────────────────────

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

    /// Wires the contracts that feed the reward rate. `None` unsets a
    /// source, after which its term contributes nothing.
    pub fn set_data_sources(
        env: Env,
        caller: Address,
        health_records: Option<Address>,
        predictions: Option<Address>,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        Self::require_admin(&env, &caller, AdminTier::ContractAdmin)?;

        let instance = env.storage().instance();
        match &health_records {
            Some(addr) => instance.set(&HEALTH_RECORDS, addr),
            None => instance.remove(&HEALTH_RECORDS),
        }
        match &predictions {
            Some(addr) => instance.set(&PREDICTIONS, addr),
            None => instance.remove(&PREDICTIONS),
        }
        ttl::extend_instance(&env);

        events::publish_data_sources_set(&env, health_records, predictions);
        Ok(())
    }

    pub fn get_data_sources(env: Env) -> DataSources {
        DataSources {
            health_records: env.storage().instance().get(&HEALTH_RECORDS),
            predictions: env.storage().instance().get(&PREDICTIONS),
        }
    }

    /// Sets the limit shared by token creation and transfers.
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

    // ── Tokens ──────────────────────────────────────────────────────────────

    /// Deploys a new health token with zero balance. Rate-limited per owner.
    pub fn create_token(
        env: Env,
        owner: Address,
        name: String,
        symbol: String,
        network: String,
        metadata: Map<String, String>,
    ) -> Result<u64, ContractError> {
        Self::require_initialized(&env)?;
        owner.require_auth();
        if !rate_limit::enforce(&env, &owner) {
            return Err(ContractError::RateLimitExceeded);
        }
        Self::validate_name_symbol(&name, &symbol)?;
        if network.is_empty() || network.len() > MAX_NAME_LEN {
            return Err(ContractError::InvalidInput);
        }

        let id = Self::next_id(&env, &TOKEN_CTR);
        let now = env.ledger().timestamp();
        let token = HealthToken {
            id,
            owner: owner.clone(),
            name: name.clone(),
            symbol: symbol.clone(),
            network: network.clone(),
            balance: 0,
            staked_amount: 0,
            rewards_earned: 0,
            last_reward_calculation: now,
            metadata,
            status: TokenStatus::Active,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        Self::save_token(&env, &token);

        index::push(&env, &OWNER_TOKENS, &IndexScope::Owner(owner.clone()), id);

        Self::record_tx(&env, id, TransactionKind::Mint, 0, None, Some(owner.clone()));
        events::publish_token_deployed(&env, id, owner, name, symbol, network);
        Ok(id)
    }

    pub fn get_token(env: Env, caller: Address, token_id: u64) -> Result<HealthToken, ContractError> {
        caller.require_auth();
        Self::load_owned(&env, &caller, token_id)
    }

    /// The owner's live tokens, newest first.
    pub fn list_tokens(env: Env, owner: Address) -> Vec<HealthToken> {
        owner.require_auth();
        let ids = index::all(&env, &OWNER_TOKENS, &IndexScope::Owner(owner));
        let mut out = Vec::new(&env);
        for id in ids.iter().rev() {
            if let Some(token) = Self::load_live(&env, id) {
                out.push_back(token);
            }
        }
        out
    }

    /// Renames the token or sets its status. Any status may follow any other.
    pub fn update_token(
        env: Env,
        owner: Address,
        token_id: u64,
        name: String,
        symbol: String,
        status: TokenStatus,
    ) -> Result<HealthToken, ContractError> {
        Self::require_initialized(&env)?;
        owner.require_auth();
        let mut token = Self::load_owned(&env, &owner, token_id)?;
        Self::validate_name_symbol(&name, &symbol)?;

        token.name = name;
        token.symbol = symbol;
        token.status = status;
        token.updated_at = env.ledger().timestamp();
        Self::save_token(&env, &token);

        events::publish_token(&env, symbol_short!("TOK_UPD"), token_id, owner);
        Ok(token)
    }

    pub fn delete_token(env: Env, owner: Address, token_id: u64) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        owner.require_auth();
        let mut token = Self::load_owned(&env, &owner, token_id)?;

        let now = env.ledger().timestamp();
        token.deleted_at = Some(now);
        token.updated_at = now;
        Self::save_token(&env, &token);

        events::publish_token(&env, symbol_short!("TOK_DEL"), token_id, owner);
        Ok(())
    }

    /// Credits `amount` to a token's liquid balance.
    pub fn mint(env: Env, caller: Address, token_id: u64, amount: i128) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        Self::require_admin(&env, &caller, AdminTier::ContractAdmin)?;
        if amount <= 0 {
            return Err(ContractError::InvalidInput);
        }
        let mut token = Self::load_live(&env, token_id).ok_or(ContractError::TokenNotFound)?;

        token.balance = token
            .balance
            .checked_add(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;
        token.updated_at = env.ledger().timestamp();
        Self::save_token(&env, &token);

        Self::record_tx(&env, token_id, TransactionKind::Mint, amount, None, Some(token.owner.clone()));
        events::publish_balance(
            &env,
            symbol_short!("TOK_MINT"),
            token_id,
            token.owner,
            amount,
            token.balance,
            token.staked_amount,
        );
        Ok(token.balance)
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Moves `amount` from the liquid balance into stake. The reward clock is
    /// left alone; the next calculation covers the whole stake.
    pub fn stake(
        env: Env,
        owner: Address,
        token_id: u64,
        amount: i128,
    ) -> Result<StakingPosition, ContractError> {
        Self::require_initialized(&env)?;
        owner.require_auth();
        if amount <= 0 {
            return Err(ContractError::InvalidInput);
        }
        let mut token = Self::load_owned(&env, &owner, token_id)?;
        if token.balance < amount {
            return Err(ContractError::InsufficientBalance);
        }
        let apy_bps = Self::apy_for(&env, &owner)?;

        token.balance = token.balance.saturating_sub(amount);
        token.staked_amount = token
            .staked_amount
            .checked_add(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;
        token.updated_at = env.ledger().timestamp();
        Self::save_token(&env, &token);

        let position = positions::open(&env, token_id, amount, apy_bps);

        Self::record_tx(&env, token_id, TransactionKind::Stake, amount, Some(owner.clone()), None);
        events::publish_balance(
            &env,
            symbol_short!("STAKED"),
            token_id,
            owner,
            amount,
            token.balance,
            token.staked_amount,
        );
        Ok(position)
    }

    /// Moves `amount` from stake back to the liquid balance after a final
    /// reward calculation.
    pub fn unstake(env: Env, owner: Address, token_id: u64, amount: i128) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        owner.require_auth();
        if amount <= 0 {
            return Err(ContractError::InvalidInput);
        }
        let mut token = Self::load_owned(&env, &owner, token_id)?;
        if token.staked_amount < amount {
            return Err(ContractError::InsufficientStakedAmount);
        }

        Self::accrue(&env, &mut token)?;

        token.staked_amount = token.staked_amount.saturating_sub(amount);
        token.balance = token
            .balance
            .checked_add(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;
        token.updated_at = env.ledger().timestamp();
        Self::save_token(&env, &token);

        if positions::close_oldest_first(&env, token_id, amount) != 0 {
            return Err(ContractError::PositionMismatch);
        }

        Self::record_tx(&env, token_id, TransactionKind::Unstake, amount, None, Some(owner.clone()));
        events::publish_balance(
            &env,
            symbol_short!("UNSTAKED"),
            token_id,
            owner,
            amount,
            token.balance,
            token.staked_amount,
        );
        Ok(token.balance)
    }

    // ── Rewards ─────────────────────────────────────────────────────────────

    /// Accrues rewards for the whole days since the last calculation and
    /// returns the increment.
    pub fn calculate_rewards(env: Env, owner: Address, token_id: u64) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        owner.require_auth();
        let mut token = Self::load_owned(&env, &owner, token_id)?;
        let reward = Self::accrue(&env, &mut token)?;
        token.updated_at = env.ledger().timestamp();
        Self::save_token(&env, &token);
        Ok(reward)
    }

    /// The reward `calculate_rewards` would accrue now, without storing it.
    pub fn pending_rewards(env: Env, caller: Address, token_id: u64) -> Result<i128, ContractError> {
        caller.require_auth();
        let token = Self::load_owned(&env, &caller, token_id)?;
        let (reward, _) = Self::reward_since_last(&env, &token, env.ledger().timestamp())?;
        Ok(reward)
    }

    /// The APY a new stake by `owner` would lock in, in basis points.
    pub fn current_apy_bps(env: Env, owner: Address) -> Result<u32, ContractError> {
        Self::apy_for(&env, &owner)
    }

    /// Moves the already calculated `rewards_earned` into the liquid balance.
    /// Does not run a calculation, so the reward clock keeps running.
    /// Returns the amount claimed; zero when there is nothing to claim.
    pub fn claim_rewards(env: Env, owner: Address, token_id: u64) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        owner.require_auth();
        let mut token = Self::load_owned(&env, &owner, token_id)?;

        let claimed = token.rewards_earned;
        if claimed > 0 {
            token.balance = token
                .balance
                .checked_add(claimed)
                .ok_or(ContractError::ArithmeticOverflow)?;
            token.rewards_earned = 0;
        }
        token.updated_at = env.ledger().timestamp();
        Self::save_token(&env, &token);

        if claimed > 0 {
            Self::record_tx(&env, token_id, TransactionKind::Reward, claimed, None, Some(owner.clone()));
            events::publish_balance(
                &env,
                symbol_short!("RWD_CLM"),
                token_id,
                owner,
                claimed,
                token.balance,
                token.staked_amount,
            );
        }
        Ok(claimed)
    }

    // ── Transfers ───────────────────────────────────────────────────────────

    /// Moves `amount` from one of the caller's tokens to another live token
    /// with the same symbol. Rate-limited per sender.
    pub fn transfer(
        env: Env,
        owner: Address,
        from_token_id: u64,
        to_token_id: u64,
        amount: i128,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        owner.require_auth();
        if !rate_limit::enforce(&env, &owner) {
            return Err(ContractError::RateLimitExceeded);
        }
        if amount <= 0 || from_token_id == to_token_id {
            return Err(ContractError::InvalidInput);
        }
        let mut from = Self::load_owned(&env, &owner, from_token_id)?;
        let mut to = Self::load_live(&env, to_token_id).ok_or(ContractError::TokenNotFound)?;
        if from.symbol != to.symbol {
            return Err(ContractError::SymbolMismatch);
        }
        if from.balance < amount {
            return Err(ContractError::InsufficientBalance);
        }

        let now = env.ledger().timestamp();
        from.balance = from.balance.saturating_sub(amount);
        from.updated_at = now;
        to.balance = to
            .balance
            .checked_add(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;
        to.updated_at = now;
        Self::save_token(&env, &from);
        Self::save_token(&env, &to);

        let recipient = to.owner.clone();
        Self::record_tx(
            &env,
            from_token_id,
            TransactionKind::Transfer,
            amount,
            Some(owner.clone()),
            Some(recipient.clone()),
        );
        Self::record_tx(
            &env,
            to_token_id,
            TransactionKind::Transfer,
            amount,
            Some(owner.clone()),
            Some(recipient.clone()),
        );
        events::publish_transfer(&env, from_token_id, to_token_id, owner, recipient, amount);
        Ok(())
    }

    // ── History ─────────────────────────────────────────────────────────────

    pub fn get_transaction(
        env: Env,
        caller: Address,
        tx_id: u64,
    ) -> Result<TokenTransaction, ContractError> {
        caller.require_auth();
        let tx: TokenTransaction = env
            .storage()
            .persistent()
            .get(&(TX, tx_id))
            .ok_or(ContractError::TransactionNotFound)?;
        Self::load_owned(&env, &caller, tx.token_id)?;
        Ok(tx)
    }

    /// The token's transactions, newest first.
    pub fn list_transactions(
        env: Env,
        owner: Address,
        token_id: u64,
    ) -> Result<Vec<TokenTransaction>, ContractError> {
        owner.require_auth();
        Self::load_owned(&env, &owner, token_id)?;
        let ids = index::all(&env, &TOKEN_TXS, &IndexScope::Parent(token_id));
        let mut out = Vec::new(&env);
        for id in ids.iter().rev() {
            if let Some(tx) = env.storage().persistent().get(&(TX, id)) {
                out.push_back(tx);
            }
        }
        Ok(out)
    }

    /// Up to `limit` of the token's transactions, newest first, after
    /// skipping the `offset` newest.
    pub fn list_transactions_page(
        env: Env,
        owner: Address,
        token_id: u64,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<TokenTransaction>, ContractError> {
        owner.require_auth();
        Self::load_owned(&env, &owner, token_id)?;
        let ids = index::newest(&env, &TOKEN_TXS, &IndexScope::Parent(token_id), offset, limit);
        let mut out = Vec::new(&env);
        for id in ids.iter() {
            if let Some(tx) = env.storage().persistent().get(&(TX, id)) {
                out.push_back(tx);
            }
        }
        Ok(out)
    }

    /// The token's staking positions, newest first.
    pub fn list_staking_positions(
        env: Env,
        owner: Address,
        token_id: u64,
    ) -> Result<Vec<StakingPosition>, ContractError> {
        owner.require_auth();
        Self::load_owned(&env, &owner, token_id)?;
        Ok(positions::list(&env, token_id))
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

    fn validate_name_symbol(name: &String, symbol: &String) -> Result<(), ContractError> {
        if name.is_empty() || name.len() > MAX_NAME_LEN {
            return Err(ContractError::InvalidInput);
        }
        if symbol.is_empty() || symbol.len() > MAX_SYMBOL_LEN {
            return Err(ContractError::InvalidInput);
        }
        Ok(())
    }

    /// Latest health score and recent prediction counts for `owner`. A
    /// source that is not configured contributes zero.
    fn reward_inputs(env: &Env, owner: &Address, now: u64) -> (u32, ComplianceCounts) {
        let health_score = env
            .storage()
            .instance()
            .get::<_, Address>(&HEALTH_RECORDS)
            .map(|addr| HealthRecordsClient::new(env, &addr).latest_health_score(owner))
            .unwrap_or(0);
        let since = now.saturating_sub(COMPLIANCE_WINDOW_DAYS * SECONDS_PER_DAY);
        let counts = env
            .storage()
            .instance()
            .get::<_, Address>(&PREDICTIONS)
            .map(|addr| PredictionsClient::new(env, &addr).compliance_counts(owner, &since))
            .unwrap_or_default();
        (health_score, counts)
    }

    fn apy_for(env: &Env, owner: &Address) -> Result<u32, ContractError> {
        let (health_score, counts) = Self::reward_inputs(env, owner, env.ledger().timestamp());
        rewards::apy_bps(health_score, &counts).ok_or(ContractError::ArithmeticOverflow)
    }

    /// Reward and whole days elapsed since the token's last calculation.
    fn reward_since_last(env: &Env, token: &HealthToken, now: u64) -> Result<(i128, u64), ContractError> {
        let days = rewards::days_elapsed(token.last_reward_calculation, now);
        if token.staked_amount <= 0 || days == 0 {
            return Ok((0, days));
        }
        let (health_score, counts) = Self::reward_inputs(env, &token.owner, now);
        let reward = rewards::accrued_reward(token.staked_amount, days, health_score, &counts)
            .ok_or(ContractError::ArithmeticOverflow)?;
        Ok((reward, days))
    }

    /// Folds pending rewards into `rewards_earned` and restarts the clock.
    /// The caller persists the token.
    fn accrue(env: &Env, token: &mut HealthToken) -> Result<i128, ContractError> {
        let now = env.ledger().timestamp();
        let (reward, days) = Self::reward_since_last(env, token, now)?;
        token.rewards_earned = token
            .rewards_earned
            .checked_add(reward)
            .ok_or(ContractError::ArithmeticOverflow)?;
        token.last_reward_calculation = now;

        positions::attribute_rewards(env, token.id, reward, token.staked_amount);
        events::publish_rewards_calculated(
            env,
            token.id,
            token.owner.clone(),
            reward,
            token.rewards_earned,
            days,
        );
        Ok(reward)
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

    fn record_tx(
        env: &Env,
        token_id: u64,
        kind: TransactionKind,
        amount: i128,
        from: Option<Address>,
        to: Option<Address>,
    ) -> u64 {
        let id = Self::next_id(env, &TX_CTR);
        let tx = TokenTransaction {
            id,
            token_id,
            kind,
            amount,
            from,
            to,
            status: TransactionStatus::Completed,
            created_at: env.ledger().timestamp(),
        };
        let key = (TX, id);
        env.storage().persistent().set(&key, &tx);
        ttl::extend_persistent(env, &key);

        index::push(env, &TOKEN_TXS, &IndexScope::Parent(token_id), id);
        id
    }

    fn save_token(env: &Env, token: &HealthToken) {
        let key = (TOKEN, token.id);
        env.storage().persistent().set(&key, token);
        ttl::extend_persistent(env, &key);
    }

    fn load_live(env: &Env, token_id: u64) -> Option<HealthToken> {
        let token: HealthToken = env.storage().persistent().get(&(TOKEN, token_id))?;
        if token.deleted_at.is_some() {
            return None;
        }
        Some(token)
    }

    fn load_owned(env: &Env, caller: &Address, token_id: u64) -> Result<HealthToken, ContractError> {
        let token = Self::load_live(env, token_id).ok_or(ContractError::TokenNotFound)?;
        if token.owner != *caller {
            return Err(ContractError::Unauthorized);
        }
        Ok(token)
    }
}
