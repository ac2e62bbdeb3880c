//! # Safe Math Operations
//!
//! Overflow-checked arithmetic for both on-chain and off-chain use. Amounts are
//! `u64`; every product of two amounts is taken in `u128` and narrowed back
//! through [`safe_cast_u128_to_u64`].

use integer_sqrt::IntegerSquareRoot;

use crate::errors::{CoreResult, CpmmCoreError};

/// Macro to generate safe arithmetic functions
macro_rules! safe_arith {
    // Division operations with zero check
    (div, $fn_name:ident, $type:ty) => {
        pub fn $fn_name(a: $type, b: $type) -> CoreResult<$type> {
            if b == 0 {
                return Err(CpmmCoreError::DivisionByZero);
            }
            Ok(a / b)
        }
    };

    // Binary operations with checked methods
    ($fn_name:ident, $type:ty, $checked_method:ident) => {
        pub fn $fn_name(a: $type, b: $type) -> CoreResult<$type> {
            a.$checked_method(b).ok_or(CpmmCoreError::Overflow)
        }
    };
}

safe_arith!(safe_add_u64, u64, checked_add);
safe_arith!(safe_sub_u64, u64, checked_sub);
safe_arith!(safe_mul_u64, u64, checked_mul);
safe_arith!(div, safe_div_u64, u64);

safe_arith!(safe_add_u128, u128, checked_add);
safe_arith!(safe_sub_u128, u128, checked_sub);
safe_arith!(safe_mul_u128, u128, checked_mul);
safe_arith!(div, safe_div_u128, u128);

/// Narrow a `u128` intermediate back to the amount domain
pub fn safe_cast_u128_to_u64(value: u128) -> CoreResult<u64> {
    u64::try_from(value).map_err(|_| CpmmCoreError::Overflow)
}

/// Exact product of two amounts
#[inline]
pub fn wide_mul(a: u64, b: u64) -> u128 {
    // u64::MAX * u64::MAX < u128::MAX
    (a as u128) * (b as u128)
}

/// `floor(a * b / denominator)` with a `u128` intermediate
pub fn mul_div_floor_u64(a: u64, b: u64, denominator: u64) -> CoreResult<u64> {
    let quotient = safe_div_u128(wide_mul(a, b), denominator as u128)?;
    safe_cast_u128_to_u64(quotient)
}

/// `ceil(a * b / denominator)` with a `u128` intermediate
pub fn mul_div_ceil_u64(a: u64, b: u64, denominator: u64) -> CoreResult<u64> {
    if denominator == 0 {
        return Err(CpmmCoreError::DivisionByZero);
    }
    let product = wide_mul(a, b);
    let d = denominator as u128;
    let mut quotient = product / d;
    if product % d != 0 {
        quotient = safe_add_u128(quotient, 1)?;
    }
    safe_cast_u128_to_u64(quotient)
}

/// `floor(sqrt(a * b))`; always fits in `u64`
pub fn sqrt_product_u64(a: u64, b: u64) -> CoreResult<u64> {
    safe_cast_u128_to_u64(wide_mul(a, b).integer_sqrt())
}
