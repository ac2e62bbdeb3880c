//! Fee registry entry: one per market-maker instance.

use solana_program::pubkey::Pubkey;

use crate::constants::MAX_FEE_BPS_EXCLUSIVE;
use crate::errors::{CoreResult, CpmmCoreError};

/// Reject fee rates of 100% or more
pub fn validate_fee_bps(fee_bps: u16) -> CoreResult<()> {
    if fee_bps >= MAX_FEE_BPS_EXCLUSIVE {
        return Err(CpmmCoreError::InvalidFeeRate);
    }
    Ok(())
}

/// Administrator and swap fee shared by every pool under one registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub struct RegistryEntry {
    /// Caller-chosen identifier
    pub id: Pubkey,
    /// Identity allowed to change `fee_bps`
    pub admin: Pubkey,
    /// Fee charged on swap input, in basis points
    pub fee_bps: u16,
}

impl RegistryEntry {
    pub fn new(id: Pubkey, admin: Pubkey, fee_bps: u16) -> CoreResult<Self> {
        validate_fee_bps(fee_bps)?;
        Ok(Self { id, admin, fee_bps })
    }

    /// Admin-gated fee change; applies to subsequent swaps only
    pub fn set_fee(&mut self, caller: &Pubkey, fee_bps: u16) -> CoreResult<()> {
        if *caller != self.admin {
            return Err(CpmmCoreError::Unauthorized);
        }
        validate_fee_bps(fee_bps)?;
        self.fee_bps = fee_bps;
        Ok(())
    }
}
