//! Shared building blocks for the healthcare contract suite.
//!
//! This crate provides:
//! - [`admin_tiers`]: three-tier admin hierarchy used by every contract.
//! - [`rate_limit`]: fixed-window limiter guarding ledger-heavy endpoints.
//! - [`nft`]: record NFT registry and the `ipfs://` content hash.
//! - [`errors`]: error classification shared by the per-contract enums.
//! - [`index`]: paged per-owner id indexes.
//! - [`interfaces`]: cross-contract clients (health score, compliance,
//!   policy ownership).
//! - [`text`] and [`ttl`]: small `no_std` helpers.

#![no_std]

pub mod admin_tiers;
pub mod errors;
pub mod index;
pub mod interfaces;
pub mod nft;
pub mod rate_limit;
pub mod text;
pub mod ttl;

pub use admin_tiers::AdminTier;
pub use errors::{Classified, ErrorCategory};
pub use index::IndexScope;
pub use interfaces::{
    ComplianceCounts, HealthRecordsClient, InsuranceClient, PredictionsClient,
};
pub use nft::{NftAttribute, NftMetadata, NftRef, NftToken};
pub use rate_limit::{RateLimiterConfig, RateLimiterState};

/// Seconds in one day; every day-based calculation in the suite uses it.
pub const SECONDS_PER_DAY: u64 = 86_400;
