use anchor_lang::prelude::*;
use cpmm_core::RegistryEntry;

use crate::error::CpmmError;

/// Fee registry shared by every pool created under it
#[account]
#[derive(InitSpace)]
pub struct Amm {
    /// Caller-chosen identifier, the only seed of this account
    pub id: Pubkey,
    /// Signer allowed to change the fee
    pub admin: Pubkey,
    /// Swap fee in basis points
    pub fee_bps: u16,
    pub bump: u8,
}

impl Amm {
    pub fn entry(&self) -> RegistryEntry {
        RegistryEntry {
            id: self.id,
            admin: self.admin,
            fee_bps: self.fee_bps,
        }
    }

    /// Admin-gated fee change, validated by the shared registry rules
    pub fn set_fee(&mut self, caller: &Pubkey, fee_bps: u16) -> Result<()> {
        let mut entry = self.entry();
        entry.set_fee(caller, fee_bps).map_err(CpmmError::from)?;
        self.fee_bps = entry.fee_bps;
        Ok(())
    }
}
