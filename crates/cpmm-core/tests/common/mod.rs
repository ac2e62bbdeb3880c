//! Shared fixtures for engine tests

use std::sync::Once;

use cpmm_core::custody::InMemoryCustody;
use cpmm_core::engine::{Amm, EngineConfig};
use cpmm_core::{PoolKey, Pubkey};

static INIT: Once = Once::new();

/// Route engine logs to the test writer; safe to call from every test
pub fn init_test_tracing() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .init();
    });
}

pub const FUNDING: u64 = 1_000_000_000_000;

pub struct TestContext {
    pub amm: Amm<InMemoryCustody>,
    pub admin: Pubkey,
    pub registry: Pubkey,
    pub key: PoolKey,
}

impl TestContext {
    pub fn new(fee_bps: u16) -> Self {
        Self::with_config(EngineConfig::new(Pubkey::new_unique()), fee_bps)
    }

    pub fn with_config(config: EngineConfig, fee_bps: u16) -> Self {
        init_test_tracing();

        let mut amm = Amm::new(config, InMemoryCustody::new());
        let admin = Pubkey::new_unique();
        let registry = amm
            .create_amm(Pubkey::new_unique(), admin, fee_bps)
            .unwrap();
        let record = amm
            .create_pool(registry, Pubkey::new_unique(), Pubkey::new_unique())
            .unwrap();

        Self {
            amm,
            admin,
            registry,
            key: record.key,
        }
    }

    /// A new user holding [`FUNDING`] of both pool assets
    pub fn funded_user(&mut self) -> Pubkey {
        let user = Pubkey::new_unique();
        let custody = self.amm.custody_mut();
        custody.credit(user, self.key.asset_a(), FUNDING).unwrap();
        custody.credit(user, self.key.asset_b(), FUNDING).unwrap();
        user
    }

    pub fn balance_a(&self, owner: Pubkey) -> u64 {
        use cpmm_core::custody::{Custody, CustodyAccount};
        self.amm
            .custody()
            .balance(&CustodyAccount::new(owner, self.key.asset_a()))
    }

    pub fn balance_b(&self, owner: Pubkey) -> u64 {
        use cpmm_core::custody::{Custody, CustodyAccount};
        self.amm
            .custody()
            .balance(&CustodyAccount::new(owner, self.key.asset_b()))
    }
}
