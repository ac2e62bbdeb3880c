//! PDA derivation helpers
//!
//! Addresses are derived by the core crate so the program and off-chain
//! tooling always agree.

use anchor_lang::prelude::*;
use cpmm_core::authority::{
    find_pool_address, find_registry_address, find_share_asset, AuthorityCapability,
};
use cpmm_core::PoolKey;

use crate::constants::AUTHORITY_SEED;
use crate::state::Pool;

/// Derive the registry PDA for an id
pub fn derive_amm(id: &Pubkey) -> (Pubkey, u8) {
    find_registry_address(id, &crate::ID)
}

/// Derive pool, authority and liquidity mint PDAs for a canonical key
pub fn derive_pool_accounts(key: &PoolKey) -> PoolAddresses {
    let (pool, pool_bump) = find_pool_address(key, &crate::ID);
    let authority = AuthorityCapability::derive(key, &crate::ID);
    let (mint_liquidity, _) = find_share_asset(key, &crate::ID);
    PoolAddresses {
        pool,
        pool_bump,
        pool_authority: authority.address(),
        authority_bump: authority.bump(),
        mint_liquidity,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolAddresses {
    pub pool: Pubkey,
    pub pool_bump: u8,
    pub pool_authority: Pubkey,
    pub authority_bump: u8,
    pub mint_liquidity: Pubkey,
}

/// Owned signer seeds of a pool authority
pub struct AuthoritySeeds {
    amm: Pubkey,
    mint_a: Pubkey,
    mint_b: Pubkey,
    bump: [u8; 1],
}

impl AuthoritySeeds {
    pub fn new(pool: &Pool, capability: &AuthorityCapability) -> Self {
        Self {
            amm: pool.amm,
            mint_a: pool.mint_a,
            mint_b: pool.mint_b,
            bump: [capability.bump()],
        }
    }

    pub fn seeds(&self) -> [&[u8]; 5] {
        [
            self.amm.as_ref(),
            self.mint_a.as_ref(),
            self.mint_b.as_ref(),
            AUTHORITY_SEED,
            &self.bump,
        ]
    }
}
