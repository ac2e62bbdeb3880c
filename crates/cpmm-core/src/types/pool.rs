//! Pool record, canonical pool key and the per-instruction reserve snapshot.

use solana_program::pubkey::Pubkey;

use crate::custody::CustodyAccount;
use crate::errors::{CoreResult, CpmmCoreError};

/// Sort two asset identifiers into canonical (byte-lexicographic) order
pub fn sort_assets(asset_x: Pubkey, asset_y: Pubkey) -> CoreResult<(Pubkey, Pubkey)> {
    if asset_x == asset_y {
        return Err(CpmmCoreError::IdenticalAssets);
    }
    if asset_x < asset_y {
        Ok((asset_x, asset_y))
    } else {
        Ok((asset_y, asset_x))
    }
}

/// Reject pairs that are identical or not already in canonical order
pub fn validate_canonical_order(asset_a: &Pubkey, asset_b: &Pubkey) -> CoreResult<()> {
    if asset_a == asset_b {
        return Err(CpmmCoreError::IdenticalAssets);
    }
    if asset_a > asset_b {
        return Err(CpmmCoreError::NonCanonicalAssetOrder);
    }
    Ok(())
}

/// The (registry, asset_a, asset_b) triple identifying exactly one pool.
///
/// Constructed only through [`PoolKey::new`], so `asset_a < asset_b` always
/// holds and `(A, B)` and `(B, A)` map to the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolKey {
    registry: Pubkey,
    asset_a: Pubkey,
    asset_b: Pubkey,
}

impl PoolKey {
    pub fn new(registry: Pubkey, asset_x: Pubkey, asset_y: Pubkey) -> CoreResult<Self> {
        let (asset_a, asset_b) = sort_assets(asset_x, asset_y)?;
        Ok(Self {
            registry,
            asset_a,
            asset_b,
        })
    }

    pub fn registry(&self) -> Pubkey {
        self.registry
    }

    pub fn asset_a(&self) -> Pubkey {
        self.asset_a
    }

    pub fn asset_b(&self) -> Pubkey {
        self.asset_b
    }

    /// Returns `true` if `asset` is one of the two pool assets
    pub fn contains(&self, asset: &Pubkey) -> bool {
        self.asset_a == *asset || self.asset_b == *asset
    }
}

/// Which asset the trader supplies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub enum SwapDirection {
    /// Pay asset A, receive asset B
    AToB,
    /// Pay asset B, receive asset A
    BToA,
}

impl SwapDirection {
    /// Maps the on-chain `swap_a` flag
    pub fn from_swap_a(swap_a: bool) -> Self {
        if swap_a {
            SwapDirection::AToB
        } else {
            SwapDirection::BToA
        }
    }

    /// Order `(a, b)` values as `(in, out)`
    pub fn orient<T>(&self, a: T, b: T) -> (T, T) {
        match self {
            SwapDirection::AToB => (a, b),
            SwapDirection::BToA => (b, a),
        }
    }
}

/// Persistent pool record. Reserves are not stored here: the balances of
/// `custody_a` / `custody_b` are authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolRecord {
    pub key: PoolKey,
    /// Derived signing identity of the pool
    pub authority: Pubkey,
    /// Derivation salt of `authority`
    pub authority_bump: u8,
    /// Liquidity share asset, minted only by `authority`
    pub share_asset: Pubkey,
    pub custody_a: CustodyAccount,
    pub custody_b: CustodyAccount,
}

impl PoolRecord {
    /// Custody accounts ordered as `(in, out)` for a swap
    pub fn custody_for(&self, direction: SwapDirection) -> (CustodyAccount, CustodyAccount) {
        direction.orient(self.custody_a, self.custody_b)
    }

    /// The share account a holder keeps for this pool
    pub fn share_account(&self, holder: Pubkey) -> CustodyAccount {
        CustodyAccount::new(holder, self.share_asset)
    }
}

/// Reserves and supply read once at the start of an instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolSnapshot {
    pub reserve_a: u64,
    pub reserve_b: u64,
    pub total_supply: u64,
}

impl PoolSnapshot {
    pub fn phase(&self) -> PoolPhase {
        if self.total_supply == 0 && self.reserve_a == 0 && self.reserve_b == 0 {
            PoolPhase::Empty
        } else if self.total_supply > 0 && self.reserve_a > 0 && self.reserve_b > 0 {
            PoolPhase::Active
        } else {
            PoolPhase::Unbalanced
        }
    }
}

/// Lifecycle of a pool as observed from its snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub enum PoolPhase {
    /// Freshly created or fully drained; the next deposit sets the price
    Empty,
    /// Both reserves and the share supply are non-zero
    Active,
    /// Reserves without shares (direct donations) or shares without reserves
    Unbalanced,
}
