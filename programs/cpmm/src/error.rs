//! Error definitions

use anchor_lang::prelude::*;
use cpmm_core::CpmmCoreError;

#[error_code]
pub enum CpmmError {
    // Validation errors
    #[msg("Fee rate must be below 10000 basis points")]
    InvalidFee,

    #[msg("Pool mints must be distinct")]
    IdenticalMints,

    #[msg("Pool mints must be passed in canonical order")]
    NonCanonicalMintOrder,

    #[msg("First deposit requires both amounts to be non-zero")]
    ZeroDeposit,

    #[msg("Swap input must be non-zero")]
    ZeroInput,

    #[msg("Withdrawal would return nothing")]
    ZeroWithdrawal,

    // State errors
    #[msg("Registry id already in use")]
    DuplicateRegistryId,

    #[msg("Pool already exists for this mint pair")]
    PoolAlreadyExists,

    #[msg("Registry not found")]
    RegistryNotFound,

    #[msg("Pool not found")]
    PoolNotFound,

    #[msg("Pool has no liquidity")]
    PoolNotInitialized,

    #[msg("Share balance too low")]
    InsufficientShares,

    #[msg("Insufficient balance")]
    InsufficientBalance,

    #[msg("Signer is not the registry admin")]
    Unauthorized,

    #[msg("Invalid pool authority")]
    InvalidAuthority,

    #[msg("Token movement rejected")]
    CustodyRejected,

    #[msg("Invalid mint for the pool")]
    InvalidMint,

    // Economic errors
    #[msg("Deposit too small to mint any shares")]
    InsufficientShareOutput,

    #[msg("Depositing too little liquidity")]
    DepositTooSmall,

    #[msg("Output is below the minimum expected")]
    SlippageExceeded,

    #[msg("Swap would return nothing")]
    ZeroOutput,

    // Math errors
    #[msg("Math overflow")]
    MathOverflow,

    #[msg("Division by zero")]
    DivisionByZero,

    #[msg("Invariant does not hold")]
    InvariantViolated,
}

impl From<CpmmCoreError> for CpmmError {
    fn from(err: CpmmCoreError) -> Self {
        match err {
            CpmmCoreError::InvalidFeeRate => CpmmError::InvalidFee,
            CpmmCoreError::IdenticalAssets => CpmmError::IdenticalMints,
            CpmmCoreError::NonCanonicalAssetOrder => CpmmError::NonCanonicalMintOrder,
            CpmmCoreError::ZeroDeposit => CpmmError::ZeroDeposit,
            CpmmCoreError::ZeroInput => CpmmError::ZeroInput,
            CpmmCoreError::ZeroWithdrawal => CpmmError::ZeroWithdrawal,
            CpmmCoreError::DuplicateRegistryId => CpmmError::DuplicateRegistryId,
            CpmmCoreError::PoolAlreadyExists => CpmmError::PoolAlreadyExists,
            CpmmCoreError::RegistryNotFound => CpmmError::RegistryNotFound,
            CpmmCoreError::PoolNotFound => CpmmError::PoolNotFound,
            CpmmCoreError::PoolNotInitialized => CpmmError::PoolNotInitialized,
            CpmmCoreError::InsufficientShares => CpmmError::InsufficientShares,
            CpmmCoreError::InsufficientBalance => CpmmError::InsufficientBalance,
            CpmmCoreError::Unauthorized => CpmmError::Unauthorized,
            CpmmCoreError::InvalidAuthority => CpmmError::InvalidAuthority,
            CpmmCoreError::CustodyRejected => CpmmError::CustodyRejected,
            CpmmCoreError::InsufficientShareOutput => CpmmError::InsufficientShareOutput,
            CpmmCoreError::DepositTooSmall => CpmmError::DepositTooSmall,
            CpmmCoreError::SlippageExceeded => CpmmError::SlippageExceeded,
            CpmmCoreError::ZeroOutput => CpmmError::ZeroOutput,
            CpmmCoreError::Overflow => CpmmError::MathOverflow,
            CpmmCoreError::DivisionByZero => CpmmError::DivisionByZero,
            CpmmCoreError::InvariantViolated => CpmmError::InvariantViolated,
        }
    }
}
