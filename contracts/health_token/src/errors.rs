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
    TokenNotFound = 5,
    TransactionNotFound = 6,
    InsufficientBalance = 7,
    InsufficientStakedAmount = 8,
    SymbolMismatch = 9,
    RateLimitExceeded = 10,
    ArithmeticOverflow = 11,
    PositionMismatch = 12,
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
            ContractError::InvalidInput | ContractError::SymbolMismatch => ErrorCategory::Validation,
            ContractError::TokenNotFound | ContractError::TransactionNotFound => {
                ErrorCategory::NotFound
            }
            ContractError::InsufficientBalance
            | ContractError::InsufficientStakedAmount
            | ContractError::ArithmeticOverflow
            | ContractError::PositionMismatch => ErrorCategory::StateConflict,
            ContractError::RateLimitExceeded => ErrorCategory::RateLimit,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            ContractError::NotInitialized => "Contract not initialized",
            ContractError::AlreadyInitialized => "Contract already initialized",
            ContractError::Unauthorized => "Unauthorized",
            ContractError::InvalidInput => "Validation failed",
            ContractError::TokenNotFound => "Health token not found",
            ContractError::TransactionNotFound => "Token transaction not found",
            ContractError::InsufficientBalance => "Insufficient balance",
            ContractError::InsufficientStakedAmount => "Insufficient staked amount",
            ContractError::SymbolMismatch => "Recipient token has a different symbol",
            ContractError::RateLimitExceeded => "Too many blockchain requests. Please try again later.",
            ContractError::ArithmeticOverflow => "Amount out of range",
            ContractError::PositionMismatch => "Open staking positions do not cover the staked amount",
        }
    }
}
