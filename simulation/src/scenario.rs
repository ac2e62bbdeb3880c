use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use cpmm_core::math::InitialSharePolicy;
use serde::{Deserialize, Serialize};

use crate::{SimulationError, SimulationResult};

/// Scenario loaded from a TOML file
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Scenario {
    /// Name used in logs and reports
    pub name: String,

    /// How the first deposit into a pool mints shares
    #[serde(default)]
    pub share_policy: InitialSharePolicy,

    #[serde(default)]
    pub registries: Vec<RegistryConfig>,

    #[serde(default)]
    pub pools: Vec<PoolConfig>,

    /// Accounts funded before the first step
    #[serde(default)]
    pub accounts: Vec<AccountConfig>,

    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegistryConfig {
    pub name: String,
    /// Account allowed to change the fee
    pub admin: String,
    pub fee_bps: u16,
}

/// A pool between two named assets. Amounts in steps follow the
/// `asset_x` / `asset_y` order given here, not the canonical order.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PoolConfig {
    pub name: String,
    pub registry: String,
    pub asset_x: String,
    pub asset_y: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AccountConfig {
    pub name: String,
    /// Starting balance per asset name
    #[serde(default)]
    pub balances: BTreeMap<String, u64>,
}

/// One instruction against the engine.
///
/// `expect_error` names the error variant the step must fail with, e.g.
/// `"SlippageExceeded"`. A failing step without it aborts the run.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Deposit {
        user: String,
        pool: String,
        amount_x: u64,
        amount_y: u64,
        #[serde(default)]
        expect_error: Option<String>,
    },
    Withdraw {
        user: String,
        pool: String,
        /// Defaults to the user's whole share balance
        #[serde(default)]
        shares: Option<u64>,
        #[serde(default)]
        min_x: u64,
        #[serde(default)]
        min_y: u64,
        #[serde(default)]
        expect_error: Option<String>,
    },
    Swap {
        user: String,
        pool: String,
        asset_in: String,
        amount_in: u64,
        #[serde(default)]
        min_output: u64,
        #[serde(default)]
        expect_error: Option<String>,
    },
    UpdateFee {
        registry: String,
        caller: String,
        fee_bps: u16,
        #[serde(default)]
        expect_error: Option<String>,
    },
    /// Transfer straight into a pool's custody, bypassing the share ledger
    Donate {
        user: String,
        pool: String,
        asset: String,
        amount: u64,
        #[serde(default)]
        expect_error: Option<String>,
    },
}

impl Step {
    pub fn action(&self) -> &'static str {
        match self {
            Step::Deposit { .. } => "deposit",
            Step::Withdraw { .. } => "withdraw",
            Step::Swap { .. } => "swap",
            Step::UpdateFee { .. } => "update_fee",
            Step::Donate { .. } => "donate",
        }
    }

    pub fn expect_error(&self) -> Option<&str> {
        match self {
            Step::Deposit { expect_error, .. }
            | Step::Withdraw { expect_error, .. }
            | Step::Swap { expect_error, .. }
            | Step::UpdateFee { expect_error, .. }
            | Step::Donate { expect_error, .. } => expect_error.as_deref(),
        }
    }
}

impl Scenario {
    /// Load a scenario from a TOML file
    pub fn load(path: impl AsRef<Path>) -> SimulationResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| SimulationError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> SimulationResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Every asset name mentioned by a pool or an account, sorted
    pub fn asset_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .pools
            .iter()
            .flat_map(|pool| [pool.asset_x.clone(), pool.asset_y.clone()])
            .chain(
                self.accounts
                    .iter()
                    .flat_map(|account| account.balances.keys().cloned()),
            )
            .collect();
        names.sort();
        names.dedup();
        names
    }
}
