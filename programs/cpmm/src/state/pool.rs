use anchor_lang::prelude::*;
use cpmm_core::authority::AuthorityCapability;
use cpmm_core::PoolKey;

use crate::error::CpmmError;

/// Constant-product pool. Reserves live in the authority's token accounts
/// and the share supply is the liquidity mint's supply.
#[account]
#[derive(InitSpace)]
pub struct Pool {
    /// Owning registry
    pub amm: Pubkey,
    /// Token A mint (ordered: mint_a < mint_b)
    pub mint_a: Pubkey,
    /// Token B mint (ordered: mint_a < mint_b)
    pub mint_b: Pubkey,
    /// Liquidity share mint
    pub mint_liquidity: Pubkey,
    /// Signing PDA holding both reserves
    pub pool_authority: Pubkey,
    pub authority_bump: u8,
    pub bump: u8,
}

impl Pool {
    pub fn pool_key(&self) -> Result<PoolKey> {
        let key = PoolKey::new(self.amm, self.mint_a, self.mint_b).map_err(CpmmError::from)?;
        require_keys_eq!(key.asset_a(), self.mint_a, CpmmError::NonCanonicalMintOrder);
        Ok(key)
    }

    /// Rebuild the pool authority from the stored bump
    pub fn capability(&self, program_id: &Pubkey) -> Result<AuthorityCapability> {
        let capability = AuthorityCapability::reconstruct(
            &self.pool_key()?,
            self.authority_bump,
            &self.pool_authority,
            program_id,
        )
        .map_err(CpmmError::from)?;
        Ok(capability)
    }
}
