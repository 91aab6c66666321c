//! Append-only id indexes stored in fixed-size pages.
//!
//! Each page entry holds at most [`PAGE_SIZE`] ids; the length lives in its
//! own entry.

use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol, Vec};

use crate::ttl;

const IDX_LEN: Symbol = symbol_short!("IDX_LEN");
const IDX_PAGE: Symbol = symbol_short!("IDX_PAGE");

pub const PAGE_SIZE: u32 = 50;

/// Whose ids an index holds.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum IndexScope {
    Owner(Address),
    Parent(u64),
    Global,
}

fn len_key(name: &Symbol, scope: &IndexScope) -> (Symbol, Symbol, IndexScope) {
    (IDX_LEN, name.clone(), scope.clone())
}

fn page_key(name: &Symbol, scope: &IndexScope, page: u32) -> (Symbol, Symbol, IndexScope, u32) {
    (IDX_PAGE, name.clone(), scope.clone(), page)
}

pub fn len(env: &Env, name: &Symbol, scope: &IndexScope) -> u32 {
    env.storage()
        .persistent()
        .get(&len_key(name, scope))
        .unwrap_or(0)
}

/// Ids stored in page `page`, oldest first.
pub fn page(env: &Env, name: &Symbol, scope: &IndexScope, page: u32) -> Vec<u64> {
    env.storage()
        .persistent()
        .get(&page_key(name, scope, page))
        .unwrap_or(Vec::new(env))
}

pub fn push(env: &Env, name: &Symbol, scope: &IndexScope, id: u64) {
    let count = len(env, name, scope);

    let pkey = page_key(name, scope, count / PAGE_SIZE);
    let mut ids: Vec<u64> = env
        .storage()
        .persistent()
        .get(&pkey)
        .unwrap_or(Vec::new(env));
    ids.push_back(id);
    env.storage().persistent().set(&pkey, &ids);
    ttl::extend_persistent(env, &pkey);

    let lkey = len_key(name, scope);
    env.storage()
        .persistent()
        .set(&lkey, &count.saturating_add(1));
    ttl::extend_persistent(env, &lkey);
}

/// Every id in the index, oldest first.
pub fn all(env: &Env, name: &Symbol, scope: &IndexScope) -> Vec<u64> {
    let count = len(env, name, scope);
    let mut out = Vec::new(env);
    if count == 0 {
        return out;
    }
    for p in 0..=((count - 1) / PAGE_SIZE) {
        out.append(&page(env, name, scope, p));
    }
    out
}

/// Up to `limit` ids, newest first, skipping the `offset` newest.
pub fn newest(env: &Env, name: &Symbol, scope: &IndexScope, offset: u32, limit: u32) -> Vec<u64> {
    let mut out = Vec::new(env);
    let count = len(env, name, scope);
    if offset >= count || limit == 0 {
        return out;
    }

    let mut pos = count - offset;
    let mut loaded: Option<(u32, Vec<u64>)> = None;
    while pos > 0 && out.len() < limit {
        pos -= 1;
        let p = pos / PAGE_SIZE;
        if loaded.as_ref().map(|(n, _)| *n) != Some(p) {
            loaded = Some((p, page(env, name, scope, p)));
        }
        if let Some((_, ids)) = &loaded {
            if let Some(id) = ids.get(pos % PAGE_SIZE) {
                out.push_back(id);
            }
        }
    }
    out
}
