//! # Initial Share Policy
//!
//! How many shares the first deposit into an empty pool mints. Kept behind one
//! function so the convention can change without touching the rest of the
//! math.

use crate::constants::MINIMUM_LIQUIDITY;
use crate::errors::{CoreResult, CpmmCoreError};
use crate::math::safe_math::{safe_sub_u64, sqrt_product_u64};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "client", serde(tag = "kind", rename_all = "snake_case"))]
pub enum InitialSharePolicy {
    /// `floor(sqrt(da * db))`, all credited to the depositor
    #[default]
    GeometricMean,
    /// `floor(sqrt(da * db))` with `locked` of them credited to nobody
    LockedMinimum { locked: u64 },
}

impl InitialSharePolicy {
    /// Lock [`MINIMUM_LIQUIDITY`] shares on first deposit
    pub fn locked_minimum() -> Self {
        InitialSharePolicy::LockedMinimum {
            locked: MINIMUM_LIQUIDITY,
        }
    }
}

/// Shares created by a first deposit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitialShares {
    /// Credited to the depositor
    pub depositor: u64,
    /// Added to supply, owned by nobody
    pub locked: u64,
}

/// Shares minted for the deposit `(amount_a, amount_b)` into an empty pool
pub fn initial_shares(
    amount_a: u64,
    amount_b: u64,
    policy: InitialSharePolicy,
) -> CoreResult<InitialShares> {
    let geometric_mean = sqrt_product_u64(amount_a, amount_b)?;

    match policy {
        InitialSharePolicy::GeometricMean => {
            if geometric_mean == 0 {
                return Err(CpmmCoreError::InsufficientShareOutput);
            }
            Ok(InitialShares {
                depositor: geometric_mean,
                locked: 0,
            })
        }
        InitialSharePolicy::LockedMinimum { locked } => {
            if geometric_mean <= locked {
                return Err(CpmmCoreError::DepositTooSmall);
            }
            Ok(InitialShares {
                depositor: safe_sub_u64(geometric_mean, locked)?,
                locked,
            })
        }
    }
}
