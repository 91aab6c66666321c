//! Error classification shared by the per-contract `#[contracterror]` enums.
//!
//! Each contract keeps its own enum with stable `u32` codes; implementing
//! [`Classified`] lets clients and tests reason about failures uniformly
//! (validation, authorization, not-found, state conflicts, rate limiting).

/// Broad failure family of a contract error.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ErrorCategory {
    /// Malformed or out-of-range input.
    Validation,
    /// Caller lacks ownership or the required admin tier.
    Authorization,
    /// The record does not exist or has been soft-deleted.
    NotFound,
    /// A business rule rejects the operation in the current state.
    StateConflict,
    /// Too many requests in the current window; retry later.
    RateLimit,
    /// The contract is not (or already) initialized, or a dependency is unset.
    Configuration,
}

pub trait Classified: Copy {
    /// Stable numeric code, identical to the `#[repr(u32)]` discriminant.
    fn code(&self) -> u32;

    fn category(&self) -> ErrorCategory;

    /// Human-readable description suitable for client display.
    fn message(&self) -> &'static str;

    fn retryable(&self) -> bool {
        self.category() == ErrorCategory::RateLimit
    }
}
