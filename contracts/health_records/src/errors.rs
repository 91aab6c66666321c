use common::{Classified, ErrorCategory};
use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidInput = 4,
    RecordNotFound = 5,
    AlreadyMinted = 6,
    RateLimitExceeded = 7,
    InvalidHealthScore = 8,
    InvalidVitals = 9,
}

impl Classified for ContractError {
    fn code(&self) -> u32 {
        *self as u32
    }

    fn category(&self) -> ErrorCategory {
        match self {
            ContractError::NotInitialized | ContractError::AlreadyInitialized => {
                ErrorCategory::Configuration
            }
            ContractError::Unauthorized => ErrorCategory::Authorization,
            ContractError::InvalidInput
            | ContractError::InvalidHealthScore
            | ContractError::InvalidVitals => ErrorCategory::Validation,
            ContractError::RecordNotFound => ErrorCategory::NotFound,
            ContractError::AlreadyMinted => ErrorCategory::StateConflict,
            ContractError::RateLimitExceeded => ErrorCategory::RateLimit,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            ContractError::NotInitialized => "Contract not initialized",
            ContractError::AlreadyInitialized => "Contract already initialized",
            ContractError::Unauthorized => "Unauthorized",
            ContractError::InvalidInput => "Validation failed",
            ContractError::RecordNotFound => "Health record not found",
            ContractError::AlreadyMinted => "An NFT has already been minted for this record",
            ContractError::RateLimitExceeded => "Too many blockchain requests. Please try again later.",
            ContractError::InvalidHealthScore => "Health score must be between 0 and 100",
            ContractError::InvalidVitals => "Vital signs are out of range",
        }
    }
}
