use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol, Vec};

use crate::ttl;

// ── Storage keys ─────────────────────────────────────────────────────────────

const ADMIN_TIER: Symbol = symbol_short!("ADM_TIER");
const SUPER_ADMIN: Symbol = symbol_short!("S_ADMIN");
const ADMIN_LIST: Symbol = symbol_short!("ADM_LIST");

// ── Tiers ────────────────────────────────────────────────────────────────────

/// Admin hierarchy shared by every contract in the suite.
///
/// - `SuperAdmin`    – promotes and demotes other admins, plus everything below.
/// - `ContractAdmin` – changes contract configuration, mints tokens, adjudicates
///                     claims and reviews vaccination requests.
/// - `OperatorAdmin` – day-to-day operations such as registering AI operators.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum AdminTier {
    OperatorAdmin = 1,
    ContractAdmin = 2,
    SuperAdmin = 3,
}

impl AdminTier {
    pub fn rank(&self) -> u32 {
        match self {
            AdminTier::OperatorAdmin => 1,
            AdminTier::ContractAdmin => 2,
            AdminTier::SuperAdmin => 3,
        }
    }

    /// Returns true if this tier is at least as high as `min_tier`.
    pub fn has_at_least(&self, min_tier: &AdminTier) -> bool {
        self.rank() >= min_tier.rank()
    }
}

fn tier_key(admin: &Address) -> (Symbol, Address) {
    (ADMIN_TIER, admin.clone())
}

// ── Core ─────────────────────────────────────────────────────────────────────

/// Records `admin` as the primary super admin. Called once from `initialize`.
pub fn bootstrap(env: &Env, admin: &Address) {
    env.storage().instance().set(&SUPER_ADMIN, admin);
    set_tier(env, admin, AdminTier::SuperAdmin);
    track(env, admin);
}

pub fn super_admin(env: &Env) -> Option<Address> {
    env.storage().instance().get(&SUPER_ADMIN)
}

pub fn set_tier(env: &Env, admin: &Address, tier: AdminTier) {
    let key = tier_key(admin);
    env.storage().persistent().set(&key, &tier);
    ttl::extend_persistent(env, &key);
}

pub fn get_tier(env: &Env, admin: &Address) -> Option<AdminTier> {
    env.storage().persistent().get(&tier_key(admin))
}

/// Returns `true` when `caller` holds `min_tier` or higher.
pub fn require_tier(env: &Env, caller: &Address, min_tier: &AdminTier) -> bool {
    match get_tier(env, caller) {
        Some(tier) => tier.has_at_least(min_tier),
        None => false,
    }
}

/// Assigns `tier` to `target`. The caller must already be authenticated.
///
/// Returns `false` if the caller is not a `SuperAdmin`.
pub fn promote(env: &Env, caller: &Address, target: &Address, tier: AdminTier) -> bool {
    if !require_tier(env, caller, &AdminTier::SuperAdmin) {
        return false;
    }
    set_tier(env, target, tier);
    track(env, target);
    true
}

/// Removes any tier from `target`. The primary super admin cannot be demoted.
///
/// Returns `false` if the caller is not a `SuperAdmin` or `target` is the
/// primary super admin.
pub fn demote(env: &Env, caller: &Address, target: &Address) -> bool {
    if !require_tier(env, caller, &AdminTier::SuperAdmin) {
        return false;
    }
    if super_admin(env).as_ref() == Some(target) {
        return false;
    }
    env.storage().persistent().remove(&tier_key(target));
    untrack(env, target);
    true
}

pub fn list_admins(env: &Env) -> Vec<Address> {
    env.storage()
        .persistent()
        .get(&ADMIN_LIST)
        .unwrap_or(Vec::new(env))
}

fn track(env: &Env, admin: &Address) {
    let mut admins = list_admins(env);
    if !admins.contains(admin) {
        admins.push_back(admin.clone());
        env.storage().persistent().set(&ADMIN_LIST, &admins);
    }
}

fn untrack(env: &Env, admin: &Address) {
    let admins = list_admins(env);
    let mut kept = Vec::new(env);
    for a in admins.iter() {
        if a != *admin {
            kept.push_back(a);
        }
    }
    env.storage().persistent().set(&ADMIN_LIST, &kept);
}
