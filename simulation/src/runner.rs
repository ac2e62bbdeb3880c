use std::collections::{BTreeMap, HashMap};

use cpmm_core::custody::{Custody, CustodyAccount, InMemoryCustody, Movement};
use cpmm_core::engine::{Amm, EngineConfig};
use cpmm_core::{CoreResult, CpmmCoreError, PoolKey, Pubkey, SwapDirection};
use tracing::{debug, info, warn};

use crate::report::{AccountReport, PoolReport, ScenarioReport, StepOutcome, StepReport};
use crate::scenario::{Scenario, Step};
use crate::{named_address, SimulationConfig, SimulationError, SimulationResult};

/// A pool as the scenario names it
#[derive(Debug, Clone, Copy)]
struct PoolBinding {
    key: PoolKey,
    asset_x: Pubkey,
}

impl PoolBinding {
    /// Whether the declared `x` asset is the canonical `a` side
    fn x_is_a(&self) -> bool {
        self.asset_x == self.key.asset_a()
    }

    /// Declared `(x, y)` amounts in canonical `(a, b)` order; the swap is its own inverse
    fn to_canonical(&self, x: u64, y: u64) -> (u64, u64) {
        if self.x_is_a() {
            (x, y)
        } else {
            (y, x)
        }
    }

    fn from_canonical(&self, a: u64, b: u64) -> (u64, u64) {
        self.to_canonical(a, b)
    }
}

/// Replays a [`Scenario`] against the instruction engine
pub struct ScenarioRunner {
    scenario: Scenario,
    amm: Amm<InMemoryCustody>,
    registries: HashMap<String, Pubkey>,
    pools: HashMap<String, PoolBinding>,
}

impl ScenarioRunner {
    /// Build the registries, pools and balances the scenario declares
    pub fn new(scenario: Scenario) -> SimulationResult<Self> {
        let config = SimulationConfig::deployed().with_share_policy(scenario.share_policy);
        Self::with_config(scenario, config)
    }

    pub fn with_config(scenario: Scenario, config: SimulationConfig) -> SimulationResult<Self> {
        let engine_config =
            EngineConfig::new(config.program_id).with_share_policy(config.share_policy);
        let mut runner = Self {
            amm: Amm::new(engine_config, InMemoryCustody::new()),
            registries: HashMap::new(),
            pools: HashMap::new(),
            scenario,
        };
        runner.setup()?;
        Ok(runner)
    }

    pub fn amm(&self) -> &Amm<InMemoryCustody> {
        &self.amm
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    pub fn pool_key(&self, name: &str) -> SimulationResult<PoolKey> {
        Ok(self.binding(name)?.key)
    }

    pub fn registry_address(&self, name: &str) -> SimulationResult<Pubkey> {
        self.registries
            .get(name)
            .copied()
            .ok_or_else(|| unknown("registry", name))
    }

    fn setup(&mut self) -> SimulationResult<()> {
        for registry in self.scenario.registries.clone() {
            if self.registries.contains_key(&registry.name) {
                return Err(SimulationError::DuplicateName {
                    kind: "registry",
                    name: registry.name,
                });
            }
            let id = named_address(&format!("registry:{}", registry.name));
            let address = self
                .amm
                .create_amm(id, named_address(&registry.admin), registry.fee_bps)
                .map_err(SimulationError::Setup)?;
            debug!(name = %registry.name, %address, "registry ready");
            self.registries.insert(registry.name, address);
        }

        for pool in self.scenario.pools.clone() {
            if self.pools.contains_key(&pool.name) {
                return Err(SimulationError::DuplicateName {
                    kind: "pool",
                    name: pool.name,
                });
            }
            let registry = self.registry_address(&pool.registry)?;
            let asset_x = named_address(&pool.asset_x);
            let record = self
                .amm
                .create_pool(registry, asset_x, named_address(&pool.asset_y))
                .map_err(SimulationError::Setup)?;
            debug!(name = %pool.name, authority = %record.authority, "pool ready");
            self.pools.insert(
                pool.name,
                PoolBinding {
                    key: record.key,
                    asset_x,
                },
            );
        }

        for account in &self.scenario.accounts {
            let owner = named_address(&account.name);
            for (asset, amount) in &account.balances {
                self.amm
                    .custody_mut()
                    .credit(owner, named_address(asset), *amount)
                    .map_err(SimulationError::Setup)?;
            }
        }
        Ok(())
    }

    /// Execute every step in order and report the final state.
    ///
    /// Stops at the first step whose result differs from what the scenario
    /// expects.
    pub fn run(&mut self) -> SimulationResult<ScenarioReport> {
        info!(
            scenario = %self.scenario.name,
            steps = self.scenario.steps.len(),
            "running scenario"
        );

        let mut steps = Vec::with_capacity(self.scenario.steps.len());
        for (index, step) in self.scenario.steps.clone().iter().enumerate() {
            let number = index + 1;
            let action = step.action();
            let outcome = match (self.execute(step)?, step.expect_error()) {
                (Ok(outcome), None) => outcome,
                (Ok(_), Some(expected)) => {
                    return Err(SimulationError::UnexpectedSuccess {
                        step: number,
                        action,
                        expected: expected.to_string(),
                    })
                }
                (Err(source), None) => {
                    warn!(step = number, action, %source, "step failed");
                    return Err(SimulationError::StepFailed {
                        step: number,
                        action,
                        source,
                    });
                }
                (Err(actual), Some(expected)) => {
                    if error_name(&actual) != expected {
                        return Err(SimulationError::WrongError {
                            step: number,
                            action,
                            expected: expected.to_string(),
                            actual,
                        });
                    }
                    debug!(step = number, action, error = expected, "step rejected as expected");
                    StepOutcome::Rejected {
                        error: expected.to_string(),
                    }
                }
            };
            steps.push(StepReport {
                step: number,
                action,
                outcome,
            });
        }

        let report = ScenarioReport {
            name: self.scenario.name.clone(),
            steps,
            pools: self.pool_reports()?,
            accounts: self.account_reports()?,
        };
        info!(
            scenario = %report.name,
            rejected = report.rejected_steps().count(),
            "scenario complete"
        );
        Ok(report)
    }

    /// Outer error for scenario mistakes, inner for engine rejections
    fn execute(&mut self, step: &Step) -> SimulationResult<CoreResult<StepOutcome>> {
        match step {
            Step::Deposit {
                user,
                pool,
                amount_x,
                amount_y,
                ..
            } => {
                let binding = self.binding(pool)?;
                let (desired_a, desired_b) = binding.to_canonical(*amount_x, *amount_y);
                Ok(self
                    .amm
                    .deposit_liquidity(&binding.key, named_address(user), desired_a, desired_b)
                    .map(|quote| {
                        let (amount_x, amount_y) =
                            binding.from_canonical(quote.amount_a, quote.amount_b);
                        StepOutcome::Deposited {
                            amount_x,
                            amount_y,
                            shares: quote.shares,
                            locked_shares: quote.locked_shares,
                        }
                    }))
            }
            Step::Withdraw {
                user,
                pool,
                shares,
                min_x,
                min_y,
                ..
            } => {
                let binding = self.binding(pool)?;
                let holder = named_address(user);
                let shares = match shares {
                    Some(shares) => *shares,
                    None => match self.amm.share_balance(&binding.key, &holder) {
                        Ok(balance) => balance,
                        Err(err) => return Ok(Err(err)),
                    },
                };
                let (min_a, min_b) = binding.to_canonical(*min_x, *min_y);
                Ok(self
                    .amm
                    .withdraw_liquidity(&binding.key, holder, shares, min_a, min_b)
                    .map(|quote| {
                        let (amount_x, amount_y) =
                            binding.from_canonical(quote.amount_a, quote.amount_b);
                        StepOutcome::Withdrew {
                            shares: quote.shares,
                            amount_x,
                            amount_y,
                        }
                    }))
            }
            Step::Swap {
                user,
                pool,
                asset_in,
                amount_in,
                min_output,
                ..
            } => {
                let binding = self.binding(pool)?;
                let direction = self.direction(pool, &binding, asset_in)?;
                Ok(self
                    .amm
                    .swap_exact_tokens_for_tokens(
                        &binding.key,
                        named_address(user),
                        direction,
                        *amount_in,
                        *min_output,
                    )
                    .map(|quote| StepOutcome::Swapped {
                        amount_in: quote.amount_in,
                        fee: quote.fee,
                        amount_out: quote.amount_out,
                    }))
            }
            Step::UpdateFee {
                registry,
                caller,
                fee_bps,
                ..
            } => {
                let address = self.registry_address(registry)?;
                Ok(self
                    .amm
                    .update_fee(&address, &named_address(caller), *fee_bps)
                    .map(|()| StepOutcome::FeeUpdated { fee_bps: *fee_bps }))
            }
            Step::Donate {
                user,
                pool,
                asset,
                amount,
                ..
            } => {
                let binding = self.binding(pool)?;
                let direction = self.direction(pool, &binding, asset)?;
                let Some(record) = self.amm.pool(&binding.key).copied() else {
                    return Ok(Err(CpmmCoreError::PoolNotFound));
                };
                let (custody, _) = record.custody_for(direction);
                let donor = named_address(user);
                let movement = Movement::Transfer {
                    from: CustodyAccount::new(donor, custody.asset),
                    to: custody,
                    amount: *amount,
                    signer: donor,
                };
                Ok(self
                    .amm
                    .custody_mut()
                    .execute(&[movement])
                    .map(|()| StepOutcome::Donated { amount: *amount }))
            }
        }
    }

    fn binding(&self, name: &str) -> SimulationResult<PoolBinding> {
        self.pools
            .get(name)
            .copied()
            .ok_or_else(|| unknown("pool", name))
    }

    /// Direction that sells `asset_in` into the pool
    fn direction(
        &self,
        pool: &str,
        binding: &PoolBinding,
        asset_in: &str,
    ) -> SimulationResult<SwapDirection> {
        let asset = named_address(asset_in);
        if asset == binding.key.asset_a() {
            Ok(SwapDirection::AToB)
        } else if asset == binding.key.asset_b() {
            Ok(SwapDirection::BToA)
        } else {
            Err(SimulationError::AssetNotInPool {
                pool: pool.to_string(),
                asset: asset_in.to_string(),
            })
        }
    }

    fn pool_reports(&self) -> SimulationResult<Vec<PoolReport>> {
        let mut reports = Vec::with_capacity(self.scenario.pools.len());
        for pool in &self.scenario.pools {
            let binding = self.binding(&pool.name)?;
            let fee_bps = self
                .amm
                .registry(&binding.key.registry())
                .map(|entry| entry.fee_bps)
                .ok_or_else(|| unknown("registry", &pool.registry))?;
            let snapshot = self
                .amm
                .snapshot(&binding.key)
                .map_err(SimulationError::Setup)?;
            let (reserve_x, reserve_y) =
                binding.from_canonical(snapshot.reserve_a, snapshot.reserve_b);
            reports.push(PoolReport {
                name: pool.name.clone(),
                fee_bps,
                reserve_x,
                reserve_y,
                total_supply: snapshot.total_supply,
                phase: snapshot.phase(),
            });
        }
        Ok(reports)
    }

    fn account_reports(&self) -> SimulationResult<Vec<AccountReport>> {
        let assets = self.scenario.asset_names();
        let mut reports = Vec::with_capacity(self.scenario.accounts.len());
        for account in &self.scenario.accounts {
            let owner = named_address(&account.name);
            let balances = assets
                .iter()
                .map(|asset| {
                    let held = CustodyAccount::new(owner, named_address(asset));
                    (asset.clone(), self.amm.custody().balance(&held))
                })
                .collect();

            let mut shares = BTreeMap::new();
            for pool in &self.scenario.pools {
                let binding = self.binding(&pool.name)?;
                let held = self
                    .amm
                    .share_balance(&binding.key, &owner)
                    .map_err(SimulationError::Setup)?;
                if held > 0 {
                    shares.insert(pool.name.clone(), held);
                }
            }

            reports.push(AccountReport {
                name: account.name.clone(),
                balances,
                shares,
            });
        }
        Ok(reports)
    }
}

/// Variant name of an engine error, as written in `expect_error`
fn error_name(err: &CpmmCoreError) -> String {
    format!("{err:?}")
}

fn unknown(kind: &'static str, name: &str) -> SimulationError {
    SimulationError::UnknownName {
        kind,
        name: name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario(steps: &str) -> Scenario {
        let content = format!(
            r#"
            name = "unit"

            [[registries]]
            name = "main"
            admin = "admin"
            fee_bps = 30

            [[pools]]
            name = "pair"
            registry = "main"
            asset_x = "USDC"
            asset_y = "SOL"

            [[accounts]]
            name = "alice"
            balances = {{ USDC = 1000000000, SOL = 1000000000 }}

            {steps}
            "#
        );
        Scenario::from_toml_str(&content).unwrap()
    }

    #[test]
    fn test_amounts_follow_declared_order() {
        let mut runner = ScenarioRunner::new(scenario(
            r#"
            [[steps]]
            action = "deposit"
            user = "alice"
            pool = "pair"
            amount_x = 1000000
            amount_y = 4000000
            "#,
        ))
        .unwrap();
        let report = runner.run().unwrap();

        let pool = report.pool("pair").unwrap();
        assert_eq!(pool.reserve_x, 1_000_000);
        assert_eq!(pool.reserve_y, 4_000_000);
        assert_eq!(pool.total_supply, 2_000_000);

        let alice = report.account("alice").unwrap();
        assert_eq!(alice.balances["USDC"], 999_000_000);
        assert_eq!(alice.balances["SOL"], 996_000_000);
        assert_eq!(alice.shares["pair"], 2_000_000);
    }

    #[test]
    fn test_unexpected_failure_stops_the_run() {
        let mut runner = ScenarioRunner::new(scenario(
            r#"
            [[steps]]
            action = "swap"
            user = "alice"
            pool = "pair"
            asset_in = "USDC"
            amount_in = 1000
            "#,
        ))
        .unwrap();
        assert!(matches!(
            runner.run(),
            Err(SimulationError::StepFailed {
                step: 1,
                source: CpmmCoreError::PoolNotInitialized,
                ..
            })
        ));
    }

    #[test]
    fn test_wrong_expected_error_is_reported() {
        let mut runner = ScenarioRunner::new(scenario(
            r#"
            [[steps]]
            action = "update_fee"
            registry = "main"
            caller = "alice"
            fee_bps = 10
            expect_error = "InvalidFeeRate"
            "#,
        ))
        .unwrap();
        assert!(matches!(
            runner.run(),
            Err(SimulationError::WrongError {
                actual: CpmmCoreError::Unauthorized,
                ..
            })
        ));
    }

    #[test]
    fn test_unknown_names_are_scenario_errors() {
        let mut runner = ScenarioRunner::new(scenario(
            r#"
            [[steps]]
            action = "swap"
            user = "alice"
            pool = "pair"
            asset_in = "BTC"
            amount_in = 1000
            "#,
        ))
        .unwrap();
        assert!(matches!(
            runner.run(),
            Err(SimulationError::AssetNotInPool { .. })
        ));
    }

    #[test]
    fn test_duplicate_pool_is_a_setup_error() {
        let mut scenario = scenario("");
        let mut reversed = scenario.pools[0].clone();
        reversed.name = "reversed".to_string();
        std::mem::swap(&mut reversed.asset_x, &mut reversed.asset_y);
        scenario.pools.push(reversed);

        assert!(matches!(
            ScenarioRunner::new(scenario),
            Err(SimulationError::Setup(CpmmCoreError::PoolAlreadyExists))
        ));
    }
}
