use std::collections::BTreeMap;
use std::fmt::Write as _;

use cpmm_core::PoolPhase;
use serde::Serialize;

/// Result of a full scenario run
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub name: String,
    pub steps: Vec<StepReport>,
    pub pools: Vec<PoolReport>,
    pub accounts: Vec<AccountReport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    /// 1-based position in the scenario
    pub step: usize,
    pub action: &'static str,
    #[serde(flatten)]
    pub outcome: StepOutcome,
}

/// What a step did. Amounts use the pool's declared `x` / `y` order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StepOutcome {
    Deposited {
        amount_x: u64,
        amount_y: u64,
        shares: u64,
        locked_shares: u64,
    },
    Withdrew {
        shares: u64,
        amount_x: u64,
        amount_y: u64,
    },
    Swapped {
        amount_in: u64,
        fee: u64,
        amount_out: u64,
    },
    FeeUpdated {
        fee_bps: u16,
    },
    Donated {
        amount: u64,
    },
    /// Failed with the expected error; nothing was committed
    Rejected {
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolReport {
    pub name: String,
    pub fee_bps: u16,
    pub reserve_x: u64,
    pub reserve_y: u64,
    pub total_supply: u64,
    pub phase: PoolPhase,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountReport {
    pub name: String,
    /// Balance per asset name
    pub balances: BTreeMap<String, u64>,
    /// Share balance per pool name, omitted when zero
    pub shares: BTreeMap<String, u64>,
}

impl ScenarioReport {
    pub fn pool(&self, name: &str) -> Option<&PoolReport> {
        self.pools.iter().find(|pool| pool.name == name)
    }

    pub fn account(&self, name: &str) -> Option<&AccountReport> {
        self.accounts.iter().find(|account| account.name == name)
    }

    pub fn rejected_steps(&self) -> impl Iterator<Item = &StepReport> {
        self.steps
            .iter()
            .filter(|step| matches!(step.outcome, StepOutcome::Rejected { .. }))
    }

    /// Plain-text summary for the terminal
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Scenario: {}", self.name);
        let _ = writeln!(out);

        let _ = writeln!(out, "Steps");
        for step in &self.steps {
            let _ = writeln!(out, "  {:>3}. {:<10} {}", step.step, step.action, step.outcome);
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "Pools");
        for pool in &self.pools {
            let _ = writeln!(
                out,
                "  {:<16} x={:<14} y={:<14} supply={:<14} fee={}bps {:?}",
                pool.name,
                pool.reserve_x,
                pool.reserve_y,
                pool.total_supply,
                pool.fee_bps,
                pool.phase
            );
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "Accounts");
        for account in &self.accounts {
            let balances = account
                .balances
                .iter()
                .map(|(asset, amount)| format!("{asset}={amount}"))
                .chain(
                    account
                        .shares
                        .iter()
                        .map(|(pool, shares)| format!("{pool}:shares={shares}")),
                )
                .collect::<Vec<_>>()
                .join(" ");
            let _ = writeln!(out, "  {:<16} {}", account.name, balances);
        }
        out
    }
}

impl std::fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepOutcome::Deposited {
                amount_x,
                amount_y,
                shares,
                locked_shares,
            } => {
                write!(f, "in x={amount_x} y={amount_y} shares={shares}")?;
                if *locked_shares > 0 {
                    write!(f, " locked={locked_shares}")?;
                }
                Ok(())
            }
            StepOutcome::Withdrew {
                shares,
                amount_x,
                amount_y,
            } => write!(f, "burned {shares} out x={amount_x} y={amount_y}"),
            StepOutcome::Swapped {
                amount_in,
                fee,
                amount_out,
            } => write!(f, "in={amount_in} fee={fee} out={amount_out}"),
            StepOutcome::FeeUpdated { fee_bps } => write!(f, "fee now {fee_bps}bps"),
            StepOutcome::Donated { amount } => write!(f, "donated {amount}"),
            StepOutcome::Rejected { error } => write!(f, "rejected ({error})"),
        }
    }
}
