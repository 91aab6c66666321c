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
    PolicyNotFound = 6,
    InsuranceNotConfigured = 7,
    RequestNotFound = 8,
    InvalidStatusTransition = 9,
    RateLimitExceeded = 10,
}

impl Classified for ContractError {
    fn code(&self) -> u32 {
        *self as u32
    }

    fn category(&self) -> ErrorCategory {
        match self {
            ContractError::NotInitialized
            | ContractError::AlreadyInitialized
            | ContractError::InsuranceNotConfigured => ErrorCategory::Configuration,
            ContractError::Unauthorized => ErrorCategory::Authorization,
            ContractError::InvalidInput => ErrorCategory::Validation,
            ContractError::RecordNotFound
            | ContractError::PolicyNotFound
            | ContractError::RequestNotFound => ErrorCategory::NotFound,
            ContractError::InvalidStatusTransition => ErrorCategory::StateConflict,
            ContractError::RateLimitExceeded => ErrorCategory::RateLimit,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            ContractError::NotInitialized => "Contract not initialized",
            ContractError::AlreadyInitialized => "Contract already initialized",
            ContractError::Unauthorized => "Unauthorized",
            ContractError::InvalidInput => "Validation failed",
            ContractError::RecordNotFound => "Vaccination record not found",
            ContractError::PolicyNotFound => "Insurance policy not found",
            ContractError::InsuranceNotConfigured => "Insurance contract address not set",
            ContractError::RequestNotFound => "Vaccination request not found",
            ContractError::InvalidStatusTransition => {
                "Vaccination request cannot move to the requested status"
            }
            ContractError::RateLimitExceeded => "Too many blockchain requests. Please try again later.",
        }
    }
}
