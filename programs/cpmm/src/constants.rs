//! Seeds and share-mint parameters, shared with the off-chain engine

use anchor_lang::prelude::*;
use cpmm_core::math::InitialSharePolicy;

#[constant]
pub const AUTHORITY_SEED: &[u8] = cpmm_core::AUTHORITY_SEED;

#[constant]
pub const LIQUIDITY_SEED: &[u8] = cpmm_core::LIQUIDITY_SEED;

#[constant]
pub const LIQUIDITY_DECIMALS: u8 = cpmm_core::LIQUIDITY_DECIMALS;

/// First deposits mint `floor(sqrt(a * b))`, all to the depositor, so the
/// share ledger is exactly the liquidity mint's supply
pub const SHARE_POLICY: InitialSharePolicy = InitialSharePolicy::GeometricMean;
