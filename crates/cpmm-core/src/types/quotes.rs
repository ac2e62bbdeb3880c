//! Results of the liquidity and swap math. The engine returns the same values
//! as receipts once an instruction commits.

use crate::errors::CoreResult;
use crate::math::safe_math::safe_add_u64;
use crate::types::SwapDirection;

/// Amounts drawn from a depositor and shares issued for them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub struct DepositQuote {
    /// Asset A actually drawn (never more than offered)
    pub amount_a: u64,
    /// Asset B actually drawn (never more than offered)
    pub amount_b: u64,
    /// Shares credited to the depositor
    pub shares: u64,
    /// Shares added to supply but credited to nobody
    pub locked_shares: u64,
}

impl DepositQuote {
    /// Total supply increase
    pub fn minted_total(&self) -> CoreResult<u64> {
        safe_add_u64(self.shares, self.locked_shares)
    }
}

/// Amounts paid out for burning shares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub struct WithdrawQuote {
    pub shares: u64,
    pub amount_a: u64,
    pub amount_b: u64,
}

/// Swap pricing result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub struct SwapQuote {
    pub direction: SwapDirection,
    /// Input taken from the trader, fee included
    pub amount_in: u64,
    /// Input left after the fee, used on the curve
    pub effective_in: u64,
    /// `amount_in - effective_in`, kept by the pool
    pub fee: u64,
    pub amount_out: u64,
}
