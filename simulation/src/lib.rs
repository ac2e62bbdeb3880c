/// Scenario runner for the constant-product AMM
///
/// Drives the shared instruction engine from `cpmm-core` over in-memory
/// custody, so registry, pool and liquidity flows can be replayed from a TOML
/// file without a validator. Provides:
/// - Scenario files describing registries, pools, funded accounts and steps
/// - A runner that executes the steps and checks expected failures
/// - A serializable report of every step and the final pool state
pub mod report;
pub mod runner;
pub mod scenario;

use cpmm_core::math::InitialSharePolicy;
use cpmm_core::{CpmmCoreError, Pubkey};

pub use report::{PoolReport, ScenarioReport, StepReport};
pub use runner::ScenarioRunner;
pub use scenario::{Scenario, Step};

#[derive(thiserror::Error, Debug)]
pub enum SimulationError {
    #[error("Failed to read scenario {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid scenario file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Unknown {kind} '{name}'")]
    UnknownName { kind: &'static str, name: String },

    #[error("Duplicate {kind} '{name}'")]
    DuplicateName { kind: &'static str, name: String },

    #[error("Asset '{asset}' is not part of pool '{pool}'")]
    AssetNotInPool { pool: String, asset: String },

    #[error("Setup failed: {0}")]
    Setup(CpmmCoreError),

    #[error("Step {step} ({action}) failed: {source}")]
    StepFailed {
        step: usize,
        action: &'static str,
        #[source]
        source: CpmmCoreError,
    },

    #[error("Step {step} ({action}) succeeded but {expected} was expected")]
    UnexpectedSuccess {
        step: usize,
        action: &'static str,
        expected: String,
    },

    #[error("Step {step} ({action}) failed with {actual:?} but {expected} was expected")]
    WrongError {
        step: usize,
        action: &'static str,
        expected: String,
        actual: CpmmCoreError,
    },
}

pub type SimulationResult<T> = std::result::Result<T, SimulationError>;

/// Engine settings for a simulation run
#[derive(Debug, Clone, Copy)]
pub struct SimulationConfig {
    pub program_id: Pubkey,
    pub share_policy: InitialSharePolicy,
}

impl SimulationConfig {
    /// Addresses derived exactly as the deployed program derives them
    pub fn deployed() -> Self {
        Self {
            program_id: cpmm::ID,
            share_policy: InitialSharePolicy::GeometricMean,
        }
    }

    pub fn with_share_policy(mut self, share_policy: InitialSharePolicy) -> Self {
        self.share_policy = share_policy;
        self
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::deployed()
    }
}

/// Stable address for a scenario name
///
/// Scenario files refer to users, admins and assets by name; hashing the name
/// keeps the derived pubkeys (and therefore canonical asset order) identical
/// between runs.
pub fn named_address(name: &str) -> Pubkey {
    let hash = solana_program::hash::hashv(&[b"cpmm-simulation", name.as_bytes()]);
    Pubkey::new_from_array(hash.to_bytes())
}
