//! # Protocol Constants
//!
//! PDA seeds, fee bounds and share-token parameters shared by the engine and
//! the on-chain program.

// ============================================================================
// Fee Constants
// ============================================================================

/// Basis points denominator (10,000 = 100%)
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Fee rates must be strictly below this value
pub const MAX_FEE_BPS_EXCLUSIVE: u16 = 10_000;

// ============================================================================
// PDA Seeds
// ============================================================================

/// Seed suffix for the pool authority capability
pub const AUTHORITY_SEED: &[u8] = b"authority";

/// Seed suffix for the liquidity share mint
pub const LIQUIDITY_SEED: &[u8] = b"liquidity";

// ============================================================================
// Share Token
// ============================================================================

/// Decimals of the liquidity share mint
pub const LIQUIDITY_DECIMALS: u8 = 6;

/// Shares locked forever on first deposit under
/// [`InitialSharePolicy::LockedMinimum`](crate::math::InitialSharePolicy)
pub const MINIMUM_LIQUIDITY: u64 = 100;
