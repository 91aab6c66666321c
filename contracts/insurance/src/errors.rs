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
    PolicyNotFound = 5,
    PolicyNotActive = 6,
    ClaimNotFound = 7,
    ClaimAlreadyProcessed = 8,
    ClaimExceedsCoverage = 9,
    InvalidStatusTransition = 10,
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
            ContractError::InvalidInput | ContractError::ClaimExceedsCoverage => {
                ErrorCategory::Validation
            }
            ContractError::PolicyNotFound | ContractError::ClaimNotFound => ErrorCategory::NotFound,
            ContractError::PolicyNotActive
            | ContractError::ClaimAlreadyProcessed
            | ContractError::InvalidStatusTransition => ErrorCategory::StateConflict,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            ContractError::NotInitialized => "Contract not initialized",
            ContractError::AlreadyInitialized => "Contract already initialized",
            ContractError::Unauthorized => "Unauthorized",
            ContractError::InvalidInput => "Validation failed",
            ContractError::PolicyNotFound => "Insurance policy not found",
            ContractError::PolicyNotActive => "Insurance policy is not active",
            ContractError::ClaimNotFound => "Insurance claim not found",
            ContractError::ClaimAlreadyProcessed => "Claim has already been processed",
            ContractError::ClaimExceedsCoverage => "Claim amount exceeds policy coverage",
            ContractError::InvalidStatusTransition => "Claim is not in a state that allows this action",
        }
    }
}
