//! Record NFT registry.
//!
//! Each contract that mints keeps its own token namespace: ids are sequential
//! per contract, starting at 1. Token URIs are content addresses of the
//! metadata, `ipfs://<hex sha256 of the XDR-encoded metadata>`, so the same
//! metadata always yields the same URI.

#![allow(deprecated)]

use soroban_sdk::{contracttype, symbol_short, xdr::ToXdr, Address, Env, String, Symbol, Vec};

use crate::{text, ttl};

const NFT_CTR: Symbol = symbol_short!("NFT_CTR");
const NFT: Symbol = symbol_short!("NFT");

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NftAttribute {
    pub trait_type: String,
    pub value: String,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NftMetadata {
    pub name: String,
    pub description: String,
    pub image: String,
    pub attributes: Vec<NftAttribute>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NftToken {
    pub token_id: u64,
    pub owner: Address,
    pub metadata: NftMetadata,
    pub uri: String,
    pub minted_at: u64,
    pub updated_at: u64,
    pub burned: bool,
}

/// What a record stores about its NFT.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NftRef {
    pub token_id: u64,
    pub ipfs_hash: String,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NftMintedEvent {
    pub token_id: u64,
    pub owner: Address,
    pub uri: String,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NftUriUpdatedEvent {
    pub token_id: u64,
    pub uri: String,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NftBurnedEvent {
    pub token_id: u64,
    pub owner: Address,
    pub timestamp: u64,
}

pub fn attribute(env: &Env, trait_type: &str, value: String) -> NftAttribute {
    NftAttribute {
        trait_type: String::from_str(env, trait_type),
        value,
    }
}

pub fn content_hash(env: &Env, metadata: &NftMetadata) -> String {
    let bytes = metadata.clone().to_xdr(env);
    let digest = env.crypto().sha256(&bytes).to_array();
    text::hex_with_prefix(env, "ipfs://", &digest)
}

pub fn mint(env: &Env, owner: &Address, metadata: NftMetadata) -> NftRef {
    let token_id: u64 = env
        .storage()
        .instance()
        .get(&NFT_CTR)
        .unwrap_or(0u64)
        .saturating_add(1);
    env.storage().instance().set(&NFT_CTR, &token_id);

    let now = env.ledger().timestamp();
    let uri = content_hash(env, &metadata);
    let token = NftToken {
        token_id,
        owner: owner.clone(),
        metadata,
        uri: uri.clone(),
        minted_at: now,
        updated_at: now,
        burned: false,
    };
    let key = (NFT, token_id);
    env.storage().persistent().set(&key, &token);
    ttl::extend_persistent(env, &key);

    env.events().publish(
        (symbol_short!("NFT_MINT"), owner.clone()),
        NftMintedEvent {
            token_id,
            owner: owner.clone(),
            uri: uri.clone(),
            timestamp: now,
        },
    );

    NftRef {
        token_id,
        ipfs_hash: uri,
    }
}

/// Replaces the metadata of a live token and recomputes its URI.
///
/// Returns `None` when the token does not exist or was burned.
pub fn update_uri(env: &Env, token_id: u64, metadata: NftMetadata) -> Option<NftRef> {
    let key = (NFT, token_id);
    let mut token: NftToken = env.storage().persistent().get(&key)?;
    if token.burned {
        return None;
    }

    let uri = content_hash(env, &metadata);
    token.metadata = metadata;
    token.uri = uri.clone();
    token.updated_at = env.ledger().timestamp();
    env.storage().persistent().set(&key, &token);
    ttl::extend_persistent(env, &key);

    env.events().publish(
        (symbol_short!("NFT_URI"), token_id),
        NftUriUpdatedEvent {
            token_id,
            uri: uri.clone(),
            timestamp: token.updated_at,
        },
    );

    Some(NftRef {
        token_id,
        ipfs_hash: uri,
    })
}

/// Marks a token as burned. Returns `false` if it was missing or already burned.
pub fn burn(env: &Env, token_id: u64) -> bool {
    let key = (NFT, token_id);
    let Some(mut token) = env.storage().persistent().get::<_, NftToken>(&key) else {
        return false;
    };
    if token.burned {
        return false;
    }

    token.burned = true;
    token.updated_at = env.ledger().timestamp();
    env.storage().persistent().set(&key, &token);

    env.events().publish(
        (symbol_short!("NFT_BURN"), token.owner.clone()),
        NftBurnedEvent {
            token_id,
            owner: token.owner,
            timestamp: token.updated_at,
        },
    );
    true
}

pub fn get(env: &Env, token_id: u64) -> Option<NftToken> {
    env.storage().persistent().get(&(NFT, token_id))
}
