//! # Core Error Types
//!
//! Error taxonomy shared between the off-chain engine and the on-chain
//! program. Every failure is detected before any state is committed.

use thiserror::Error;

/// Core pool errors that can occur in both environments
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub enum CpmmCoreError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Fee rate must be below 10000 basis points")]
    InvalidFeeRate,

    #[error("Pool assets must be distinct")]
    IdenticalAssets,

    #[error("Pool assets must be passed in canonical order")]
    NonCanonicalAssetOrder,

    #[error("First deposit requires both amounts to be non-zero")]
    ZeroDeposit,

    #[error("Swap input must be non-zero")]
    ZeroInput,

    #[error("Withdrawal would return nothing")]
    ZeroWithdrawal,

    // ========================================================================
    // State Errors
    // ========================================================================
    #[error("Registry id already in use")]
    DuplicateRegistryId,

    #[error("Pool already exists for this asset pair")]
    PoolAlreadyExists,

    #[error("Registry not found")]
    RegistryNotFound,

    #[error("Pool not found")]
    PoolNotFound,

    #[error("Pool has no liquidity")]
    PoolNotInitialized,

    #[error("Share balance too low")]
    InsufficientShares,

    #[error("Custody balance too low")]
    InsufficientBalance,

    #[error("Caller is not the registry admin")]
    Unauthorized,

    #[error("Authority does not match its derivation")]
    InvalidAuthority,

    #[error("Custody movement rejected")]
    CustodyRejected,

    // ========================================================================
    // Economic Errors
    // ========================================================================
    #[error("Deposit too small to mint any shares")]
    InsufficientShareOutput,

    #[error("First deposit does not cover the locked minimum liquidity")]
    DepositTooSmall,

    #[error("Output is below the minimum expected")]
    SlippageExceeded,

    #[error("Swap would return nothing")]
    ZeroOutput,

    // ========================================================================
    // Arithmetic Errors
    // ========================================================================
    #[error("Math overflow")]
    Overflow,

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Invariant does not hold")]
    InvariantViolated,
}

/// Coarse classification of [`CpmmCoreError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorKind {
    /// Bad arguments
    Validation,
    /// Arguments are fine but the referenced entities are not
    State,
    /// The trade or deposit is not worth executing
    Economic,
    /// Integer domain or curve integrity failure
    Arithmetic,
}

impl CpmmCoreError {
    pub fn kind(&self) -> ErrorKind {
        use CpmmCoreError::*;
        match self {
            InvalidFeeRate | IdenticalAssets | NonCanonicalAssetOrder | ZeroDeposit
            | ZeroInput | ZeroWithdrawal => ErrorKind::Validation,
            DuplicateRegistryId | PoolAlreadyExists | RegistryNotFound | PoolNotFound
            | PoolNotInitialized | InsufficientShares | InsufficientBalance | Unauthorized
            | InvalidAuthority | CustodyRejected => ErrorKind::State,
            InsufficientShareOutput | DepositTooSmall | SlippageExceeded | ZeroOutput => {
                ErrorKind::Economic
            }
            Overflow | DivisionByZero | InvariantViolated => ErrorKind::Arithmetic,
        }
    }
}

/// Result type using core errors
pub type CoreResult<T> = Result<T, CpmmCoreError>;
