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
    HealthRecordsNotConfigured = 5,
    HealthRecordNotFound = 6,
    OperatorNotFound = 7,
    OperatorAlreadyRegistered = 8,
    OperatorInactive = 9,
    RequestNotFound = 10,
    PredictionNotFound = 11,
    SymptomRecordNotFound = 12,
    InvalidStatusTransition = 13,
    AlreadyMinted = 14,
    RateLimitExceeded = 15,
}

impl Classified for ContractError {
    fn code(&self) -> u32 {
        *self as u32
    }

    fn category(&self) -> ErrorCategory {
        match self {
            ContractError::NotInitialized
            | ContractError::AlreadyInitialized
            | ContractError::HealthRecordsNotConfigured => ErrorCategory::Configuration,
            ContractError::Unauthorized | ContractError::OperatorInactive => {
                ErrorCategory::Authorization
            }
            ContractError::InvalidInput => ErrorCategory::Validation,
            ContractError::HealthRecordNotFound
            | ContractError::OperatorNotFound
            | ContractError::RequestNotFound
            | ContractError::PredictionNotFound
            | ContractError::SymptomRecordNotFound => ErrorCategory::NotFound,
            ContractError::OperatorAlreadyRegistered
            | ContractError::InvalidStatusTransition
            | ContractError::AlreadyMinted => ErrorCategory::StateConflict,
            ContractError::RateLimitExceeded => ErrorCategory::RateLimit,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            ContractError::NotInitialized => "Contract not initialized",
            ContractError::AlreadyInitialized => "Contract already initialized",
            ContractError::Unauthorized => "Unauthorized",
            ContractError::InvalidInput => "Validation failed",
            ContractError::HealthRecordsNotConfigured => "Health records contract is not configured",
            ContractError::HealthRecordNotFound => "Health record not found",
            ContractError::OperatorNotFound => "AI operator not found",
            ContractError::OperatorAlreadyRegistered => "AI operator already registered",
            ContractError::OperatorInactive => "AI operator is not active",
            ContractError::RequestNotFound => "Prediction request not found",
            ContractError::PredictionNotFound => "Health prediction not found",
            ContractError::SymptomRecordNotFound => "Symptom record not found",
            ContractError::InvalidStatusTransition => "Request has already been processed",
            ContractError::AlreadyMinted => "An NFT has already been minted for this prediction",
            ContractError::RateLimitExceeded => "Too many blockchain requests. Please try again later.",
        }
    }
}
