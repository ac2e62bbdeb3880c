//! # Swap Math
//!
//! Constant-product pricing with the fee charged on input:
//!
//! ```text
//! effective_in = floor(amount_in * (10000 - fee_bps) / 10000)
//! amount_out   = floor(effective_in * R_out / (R_in + effective_in))
//! ```
//!
//! The fee portion of the input stays in the pool, so `R_a * R_b` never
//! decreases across a swap.

use crate::constants::BPS_DENOMINATOR;
use crate::errors::{CoreResult, CpmmCoreError};
use crate::math::safe_math::{
    mul_div_floor_u64, safe_add_u128, safe_add_u64, safe_cast_u128_to_u64, safe_div_u128,
    safe_sub_u64, wide_mul,
};
use crate::types::{validate_fee_bps, SwapDirection, SwapQuote};

/// Input remaining after the fee is withheld
pub fn apply_fee(amount_in: u64, fee_bps: u16) -> CoreResult<u64> {
    validate_fee_bps(fee_bps)?;
    let retained = safe_sub_u64(BPS_DENOMINATOR, fee_bps as u64)?;
    mul_div_floor_u64(amount_in, retained, BPS_DENOMINATOR)
}

/// Price `amount_in` against `(reserve_in, reserve_out)`.
///
/// Reserves must come from the same snapshot that will be used to move
/// funds.
pub fn swap_output(
    direction: SwapDirection,
    reserve_in: u64,
    reserve_out: u64,
    amount_in: u64,
    fee_bps: u16,
) -> CoreResult<SwapQuote> {
    if amount_in == 0 {
        return Err(CpmmCoreError::ZeroInput);
    }
    if reserve_in == 0 || reserve_out == 0 {
        return Err(CpmmCoreError::PoolNotInitialized);
    }

    let effective_in = apply_fee(amount_in, fee_bps)?;
    let numerator = wide_mul(effective_in, reserve_out);
    let denominator = safe_add_u128(reserve_in as u128, effective_in as u128)?;
    let amount_out = safe_cast_u128_to_u64(safe_div_u128(numerator, denominator)?)?;

    if amount_out == 0 {
        return Err(CpmmCoreError::ZeroOutput);
    }

    check_invariant(reserve_in, reserve_out, amount_in, amount_out)?;

    Ok(SwapQuote {
        direction,
        amount_in,
        effective_in,
        fee: safe_sub_u64(amount_in, effective_in)?,
        amount_out,
    })
}

/// Verify `(R_in + amount_in) * (R_out - amount_out) >= R_in * R_out`
pub fn check_invariant(
    reserve_in: u64,
    reserve_out: u64,
    amount_in: u64,
    amount_out: u64,
) -> CoreResult<()> {
    if amount_out >= reserve_out {
        return Err(CpmmCoreError::InvariantViolated);
    }
    let k_before = wide_mul(reserve_in, reserve_out);
    let k_after = wide_mul(
        safe_add_u64(reserve_in, amount_in)?,
        safe_sub_u64(reserve_out, amount_out)?,
    );
    if k_after < k_before {
        return Err(CpmmCoreError::InvariantViolated);
    }
    Ok(())
}

/// Reject a quote whose output is below the trader's bound
pub fn enforce_min_output(quote: &SwapQuote, min_output: u64) -> CoreResult<()> {
    if quote.amount_out < min_output {
        return Err(CpmmCoreError::SlippageExceeded);
    }
    Ok(())
}
