//! # Pool Authority
//!
//! Every pool signs custody movements through an identity derived from its
//! key. The address is a program-derived address over
//! `[registry, asset_a, asset_b, "authority"]`, so anyone can recompute it and
//! nobody holds a private key for it.

use solana_program::pubkey::Pubkey;

use crate::constants::{AUTHORITY_SEED, LIQUIDITY_SEED};
use crate::errors::{CoreResult, CpmmCoreError};
use crate::types::PoolKey;

/// Registry address for a caller-chosen id
pub fn find_registry_address(id: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[id.as_ref()], program_id)
}

/// Pool record address
pub fn find_pool_address(key: &PoolKey, program_id: &Pubkey) -> (Pubkey, u8) {
    let (registry, asset_a, asset_b) = (key.registry(), key.asset_a(), key.asset_b());
    Pubkey::find_program_address(
        &[registry.as_ref(), asset_a.as_ref(), asset_b.as_ref()],
        program_id,
    )
}

/// Liquidity share asset address
pub fn find_share_asset(key: &PoolKey, program_id: &Pubkey) -> (Pubkey, u8) {
    let (registry, asset_a, asset_b) = (key.registry(), key.asset_a(), key.asset_b());
    Pubkey::find_program_address(
        &[
            registry.as_ref(),
            asset_a.as_ref(),
            asset_b.as_ref(),
            LIQUIDITY_SEED,
        ],
        program_id,
    )
}

/// Derived signing identity of one pool.
///
/// Holding an `AuthorityCapability` is what lets the engine move pool custody
/// or mint and burn shares. It is only obtainable by derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub struct AuthorityCapability {
    address: Pubkey,
    bump: u8,
}

impl AuthorityCapability {
    /// Search for the canonical bump and derive the authority
    pub fn derive(key: &PoolKey, program_id: &Pubkey) -> Self {
        let (registry, asset_a, asset_b) = (key.registry(), key.asset_a(), key.asset_b());
        let (address, bump) = Pubkey::find_program_address(
            &[
                registry.as_ref(),
                asset_a.as_ref(),
                asset_b.as_ref(),
                AUTHORITY_SEED,
            ],
            program_id,
        );
        Self { address, bump }
    }

    /// Rebuild the authority from a stored bump and check it against the
    /// recorded address
    pub fn reconstruct(
        key: &PoolKey,
        bump: u8,
        expected: &Pubkey,
        program_id: &Pubkey,
    ) -> CoreResult<Self> {
        let (registry, asset_a, asset_b) = (key.registry(), key.asset_a(), key.asset_b());
        let address = Pubkey::create_program_address(
            &[
                registry.as_ref(),
                asset_a.as_ref(),
                asset_b.as_ref(),
                AUTHORITY_SEED,
                &[bump],
            ],
            program_id,
        )
        .map_err(|_| CpmmCoreError::InvalidAuthority)?;

        if address != *expected {
            return Err(CpmmCoreError::InvalidAuthority);
        }
        Ok(Self { address, bump })
    }

    pub fn address(&self) -> Pubkey {
        self.address
    }

    pub fn bump(&self) -> u8 {
        self.bump
    }
}
