//! Share ledger: the outstanding supply of liquidity shares for one pool.
//!
//! Individual holder balances live with the custody collaborator; only the
//! total is tracked here as the divisor for pro-rata math.

use crate::errors::{CoreResult, CpmmCoreError};
use crate::math::safe_math::{safe_add_u64, safe_sub_u64};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub struct ShareLedger {
    /// All outstanding shares, locked ones included
    pub total_supply: u64,
    /// Shares minted to nobody on first deposit
    pub locked: u64,
}

impl ShareLedger {
    /// Record a mint of `shares`, of which `locked` are credited to nobody
    pub fn mint(&mut self, shares: u64, locked: u64) -> CoreResult<()> {
        let total_supply = safe_add_u64(self.total_supply, shares)?;
        let locked = safe_add_u64(self.locked, locked)?;
        self.total_supply = total_supply;
        self.locked = locked;
        Ok(())
    }

    /// Record a burn; locked shares can never be burned
    pub fn burn(&mut self, shares: u64) -> CoreResult<()> {
        let circulating = safe_sub_u64(self.total_supply, self.locked)?;
        if shares > circulating {
            return Err(CpmmCoreError::InsufficientShares);
        }
        self.total_supply = safe_sub_u64(self.total_supply, shares)?;
        Ok(())
    }
}
