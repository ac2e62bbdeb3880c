//! # Liquidity Math
//!
//! Deposit and withdrawal share accounting against a reserve snapshot.
//!
//! Rounding always favors the pool: shares minted are floored, amounts drawn
//! for those shares are ceiled, and amounts paid out on withdrawal are floored.

use crate::errors::{CoreResult, CpmmCoreError};
use crate::math::safe_math::{mul_div_ceil_u64, mul_div_floor_u64};
use crate::math::share_policy::{initial_shares, InitialSharePolicy};
use crate::types::{DepositQuote, PoolSnapshot, WithdrawQuote};

/// Compute the amounts drawn and shares minted for an offered deposit.
///
/// With an empty share supply the depositor sets the price and both offered
/// amounts are used in full. Otherwise the deposit is cut down to the current
/// reserve ratio and only the proportional amounts are drawn.
pub fn deposit_amounts(
    snapshot: &PoolSnapshot,
    desired_a: u64,
    desired_b: u64,
    policy: InitialSharePolicy,
) -> CoreResult<DepositQuote> {
    let PoolSnapshot {
        reserve_a,
        reserve_b,
        total_supply,
    } = *snapshot;

    if total_supply == 0 {
        if desired_a == 0 || desired_b == 0 {
            return Err(CpmmCoreError::ZeroDeposit);
        }
        let shares = initial_shares(desired_a, desired_b, policy)?;
        return Ok(DepositQuote {
            amount_a: desired_a,
            amount_b: desired_b,
            shares: shares.depositor,
            locked_shares: shares.locked,
        });
    }

    // Outstanding shares must be backed by both reserves
    if reserve_a == 0 || reserve_b == 0 {
        return Err(CpmmCoreError::InvariantViolated);
    }

    let shares_a = mul_div_floor_u64(desired_a, total_supply, reserve_a)?;
    let shares_b = mul_div_floor_u64(desired_b, total_supply, reserve_b)?;
    let shares = shares_a.min(shares_b);
    if shares == 0 {
        return Err(CpmmCoreError::InsufficientShareOutput);
    }

    let amount_a = mul_div_ceil_u64(shares, reserve_a, total_supply)?;
    let amount_b = mul_div_ceil_u64(shares, reserve_b, total_supply)?;
    debug_assert!(amount_a <= desired_a && amount_b <= desired_b);

    Ok(DepositQuote {
        amount_a,
        amount_b,
        shares,
        locked_shares: 0,
    })
}

/// Compute the amounts paid out for burning `shares`
pub fn withdraw_amounts(snapshot: &PoolSnapshot, shares: u64) -> CoreResult<WithdrawQuote> {
    if shares > snapshot.total_supply {
        return Err(CpmmCoreError::InsufficientShares);
    }
    if shares == 0 {
        return Err(CpmmCoreError::ZeroWithdrawal);
    }

    let amount_a = mul_div_floor_u64(shares, snapshot.reserve_a, snapshot.total_supply)?;
    let amount_b = mul_div_floor_u64(shares, snapshot.reserve_b, snapshot.total_supply)?;
    if amount_a == 0 && amount_b == 0 {
        return Err(CpmmCoreError::ZeroWithdrawal);
    }

    Ok(WithdrawQuote {
        shares,
        amount_a,
        amount_b,
    })
}

/// Withdrawal-side slippage bounds; a zero bound disables that side's check
pub fn enforce_min_withdrawal(quote: &WithdrawQuote, min_a: u64, min_b: u64) -> CoreResult<()> {
    if quote.amount_a < min_a || quote.amount_b < min_b {
        return Err(CpmmCoreError::SlippageExceeded);
    }
    Ok(())
}
