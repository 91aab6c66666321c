//! Fixed-window rate limiting for ledger-heavy endpoints (token deployment,
//! transfers, NFT minting).
//!
//! [`RateLimiterState::record_hit`] is pure so it can be exercised without an
//! `Env`. [`enforce`] persists the per-caller state in temporary storage and
//! reads the window configuration from instance storage.

use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::ttl;

const RL_CFG: Symbol = symbol_short!("RL_CFG");
const RL_STATE: Symbol = symbol_short!("RL_STATE");

/// Requests allowed per window when no configuration has been stored.
pub const DEFAULT_MAX_REQUESTS: u64 = 10;
/// Window length in seconds when no configuration has been stored.
pub const DEFAULT_WINDOW_SECONDS: u64 = 60;

/// Configuration for a fixed-window rate limiter.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RateLimiterConfig {
    pub max_requests_per_window: u64,
    pub window_duration_seconds: u64,
}

impl RateLimiterConfig {
    pub fn new(max_requests_per_window: u64, window_duration_seconds: u64) -> Self {
        Self {
            max_requests_per_window,
            window_duration_seconds,
        }
    }

    /// Returns `true` if the configuration represents an enabled limiter.
    pub fn is_enabled(&self) -> bool {
        self.max_requests_per_window > 0 && self.window_duration_seconds > 0
    }
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW_SECONDS)
    }
}

/// Per-caller rate limiting state.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RateLimiterState {
    /// Number of requests seen in the current window.
    pub count: u64,
    /// Timestamp (in seconds) when the current window started.
    pub window_start: u64,
}

impl RateLimiterState {
    /// Creates an empty state starting at `now`.
    pub fn new(now: u64) -> Self {
        Self {
            count: 0,
            window_start: now,
        }
    }

    /// Records a single hit at `now` using `cfg`.
    ///
    /// Returns `true` if the hit is allowed, or `false` if it exceeds the
    /// configured limit for the current window. Rejected hits are not counted.
    pub fn record_hit(&mut self, now: u64, cfg: &RateLimiterConfig) -> bool {
        if !cfg.is_enabled() {
            return true;
        }

        let window_end = self
            .window_start
            .saturating_add(cfg.window_duration_seconds);
        if now >= window_end {
            self.window_start = now;
            self.count = 0;
        }

        let next = self.count.saturating_add(1);
        if next > cfg.max_requests_per_window {
            return false;
        }

        self.count = next;
        true
    }
}

// ── On-chain helpers ─────────────────────────────────────────────────────────

pub fn set_config(env: &Env, cfg: &RateLimiterConfig) {
    env.storage().instance().set(&RL_CFG, cfg);
}

pub fn get_config(env: &Env) -> RateLimiterConfig {
    env.storage().instance().get(&RL_CFG).unwrap_or_default()
}

/// Counts one request from `caller` against the stored window.
///
/// Returns `false` when the caller is over the limit; the stored state is
/// left untouched in that case.
pub fn enforce(env: &Env, caller: &Address) -> bool {
    let cfg = get_config(env);
    if !cfg.is_enabled() {
        return true;
    }

    let now = env.ledger().timestamp();
    let key = (RL_STATE, caller.clone());
    let mut state: RateLimiterState = env
        .storage()
        .temporary()
        .get(&key)
        .unwrap_or(RateLimiterState::new(now));

    if !state.record_hit(now, &cfg) {
        return false;
    }

    env.storage().temporary().set(&key, &state);
    let ledgers = (cfg.window_duration_seconds / 5)
        .saturating_add(1)
        .min(u64::from(ttl::TTL_THRESHOLD)) as u32;
    env.storage().temporary().extend_ttl(&key, ledgers, ledgers);
    true
}
