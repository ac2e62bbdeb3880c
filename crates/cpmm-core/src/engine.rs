//! # Instruction Engine
//!
//! Runs the five market-maker instructions against in-process state and a
//! [`Custody`] collaborator. Each instruction reads one snapshot, computes
//! its effects with the pure math, submits a single custody batch and only
//! then updates the share ledger. A failed instruction leaves nothing behind.

use std::collections::HashMap;

use solana_program::pubkey::Pubkey;
use tracing::{debug, info, warn};

use crate::authority::{find_registry_address, find_share_asset, AuthorityCapability};
use crate::custody::{Custody, CustodyAccount, Movement};
use crate::errors::{CoreResult, CpmmCoreError};
use crate::math::{
    deposit_amounts, enforce_min_output, enforce_min_withdrawal, swap_output,
    withdraw_amounts, InitialSharePolicy,
};
use crate::types::{
    DepositQuote, PoolKey, PoolPhase, PoolRecord, PoolSnapshot, RegistryEntry, ShareLedger,
    SwapDirection, SwapQuote, WithdrawQuote,
};

/// Engine settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "client", serde(default))]
pub struct EngineConfig {
    /// Program id used for every address derivation
    pub program_id: Pubkey,
    /// Share issuance for a pool's first deposit
    pub share_policy: InitialSharePolicy,
}

impl EngineConfig {
    pub fn new(program_id: Pubkey) -> Self {
        Self {
            program_id,
            share_policy: InitialSharePolicy::default(),
        }
    }

    pub fn with_share_policy(mut self, share_policy: InitialSharePolicy) -> Self {
        self.share_policy = share_policy;
        self
    }
}

#[derive(Debug, Clone)]
struct PoolState {
    record: PoolRecord,
    ledger: ShareLedger,
}

/// Off-chain market maker holding every registry and pool
#[derive(Debug)]
pub struct Amm<C: Custody> {
    config: EngineConfig,
    custody: C,
    registries: HashMap<Pubkey, RegistryEntry>,
    pools: HashMap<PoolKey, PoolState>,
}

impl<C: Custody> Amm<C> {
    pub fn new(config: EngineConfig, custody: C) -> Self {
        Self {
            config,
            custody,
            registries: HashMap::new(),
            pools: HashMap::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn custody(&self) -> &C {
        &self.custody
    }

    /// Direct custody access, e.g. to fund traders or donate to a pool
    pub fn custody_mut(&mut self) -> &mut C {
        &mut self.custody
    }

    pub fn registry(&self, registry: &Pubkey) -> Option<&RegistryEntry> {
        self.registries.get(registry)
    }

    pub fn pool(&self, key: &PoolKey) -> Option<&PoolRecord> {
        self.pools.get(key).map(|state| &state.record)
    }

    pub fn ledger(&self, key: &PoolKey) -> Option<&ShareLedger> {
        self.pools.get(key).map(|state| &state.ledger)
    }

    pub fn pools(&self) -> impl Iterator<Item = &PoolRecord> {
        self.pools.values().map(|state| &state.record)
    }

    /// Canonical key for an existing pool, whichever order the assets are given in
    pub fn pool_key(
        &self,
        registry: Pubkey,
        asset_x: Pubkey,
        asset_y: Pubkey,
    ) -> CoreResult<PoolKey> {
        let key = PoolKey::new(registry, asset_x, asset_y)?;
        if !self.pools.contains_key(&key) {
            return Err(CpmmCoreError::PoolNotFound);
        }
        Ok(key)
    }

    /// Reserves and share supply as one consistent read
    pub fn snapshot(&self, key: &PoolKey) -> CoreResult<PoolSnapshot> {
        let state = self.state(key)?;
        Ok(self.read_snapshot(state))
    }

    pub fn phase(&self, key: &PoolKey) -> CoreResult<PoolPhase> {
        Ok(self.snapshot(key)?.phase())
    }

    pub fn share_balance(&self, key: &PoolKey, holder: &Pubkey) -> CoreResult<u64> {
        let state = self.state(key)?;
        Ok(self.custody.balance(&state.record.share_account(*holder)))
    }

    // ========================================================================
    // Registry
    // ========================================================================

    /// Create a fee registry; returns its address
    pub fn create_amm(&mut self, id: Pubkey, admin: Pubkey, fee_bps: u16) -> CoreResult<Pubkey> {
        let entry = RegistryEntry::new(id, admin, fee_bps)?;
        let (address, _) = find_registry_address(&id, &self.config.program_id);
        if self.registries.contains_key(&address) {
            return Err(CpmmCoreError::DuplicateRegistryId);
        }
        self.registries.insert(address, entry);

        info!(registry = %address, %admin, fee_bps, "registry created");
        Ok(address)
    }

    pub fn update_fee(
        &mut self,
        registry: &Pubkey,
        caller: &Pubkey,
        fee_bps: u16,
    ) -> CoreResult<()> {
        let entry = self
            .registries
            .get_mut(registry)
            .ok_or(CpmmCoreError::RegistryNotFound)?;
        let old_fee_bps = entry.fee_bps;
        entry.set_fee(caller, fee_bps).inspect_err(|err| {
            warn!(%registry, %caller, %err, "fee update rejected");
        })?;

        info!(%registry, old_fee_bps, fee_bps, "fee updated");
        Ok(())
    }

    // ========================================================================
    // Pools
    // ========================================================================

    /// Create the pool for an unordered asset pair under `registry`
    pub fn create_pool(
        &mut self,
        registry: Pubkey,
        asset_x: Pubkey,
        asset_y: Pubkey,
    ) -> CoreResult<PoolRecord> {
        if !self.registries.contains_key(&registry) {
            return Err(CpmmCoreError::RegistryNotFound);
        }
        let key = PoolKey::new(registry, asset_x, asset_y)?;
        if self.pools.contains_key(&key) {
            return Err(CpmmCoreError::PoolAlreadyExists);
        }

        let program_id = self.config.program_id;
        let authority = AuthorityCapability::derive(&key, &program_id);
        let (share_asset, _) = find_share_asset(&key, &program_id);
        self.custody
            .register_share_asset(share_asset, authority.address())?;

        let record = PoolRecord {
            key,
            authority: authority.address(),
            authority_bump: authority.bump(),
            share_asset,
            custody_a: CustodyAccount::new(authority.address(), key.asset_a()),
            custody_b: CustodyAccount::new(authority.address(), key.asset_b()),
        };
        self.pools.insert(
            key,
            PoolState {
                record,
                ledger: ShareLedger::default(),
            },
        );

        info!(
            %registry,
            asset_a = %key.asset_a(),
            asset_b = %key.asset_b(),
            authority = %record.authority,
            "pool created"
        );
        Ok(record)
    }

    // ========================================================================
    // Liquidity
    // ========================================================================

    pub fn quote_deposit(
        &self,
        key: &PoolKey,
        desired_a: u64,
        desired_b: u64,
    ) -> CoreResult<DepositQuote> {
        let snapshot = self.snapshot(key)?;
        deposit_amounts(&snapshot, desired_a, desired_b, self.config.share_policy)
    }

    /// Deposit up to `(desired_a, desired_b)` and mint shares for it
    pub fn deposit_liquidity(
        &mut self,
        key: &PoolKey,
        depositor: Pubkey,
        desired_a: u64,
        desired_b: u64,
    ) -> CoreResult<DepositQuote> {
        let state = self.state(key)?;
        let record = state.record;
        let authority = self.authority(&record)?;
        let snapshot = self.read_snapshot(state);

        let quote = deposit_amounts(&snapshot, desired_a, desired_b, self.config.share_policy)?;
        let mut ledger = state.ledger;
        ledger.mint(quote.minted_total()?, quote.locked_shares)?;

        let movements = [
            Movement::Transfer {
                from: CustodyAccount::new(depositor, key.asset_a()),
                to: record.custody_a,
                amount: quote.amount_a,
                signer: depositor,
            },
            Movement::Transfer {
                from: CustodyAccount::new(depositor, key.asset_b()),
                to: record.custody_b,
                amount: quote.amount_b,
                signer: depositor,
            },
            Movement::MintShares {
                to: record.share_account(depositor),
                amount: quote.shares,
                signer: authority.address(),
            },
        ];
        self.custody.execute(&movements).inspect_err(|err| {
            warn!(%depositor, %err, "deposit rejected by custody");
        })?;
        self.commit_ledger(key, ledger)?;

        info!(
            %depositor,
            amount_a = quote.amount_a,
            amount_b = quote.amount_b,
            shares = quote.shares,
            locked = quote.locked_shares,
            "liquidity deposited"
        );
        Ok(quote)
    }

    pub fn quote_withdraw(&self, key: &PoolKey, shares: u64) -> CoreResult<WithdrawQuote> {
        let snapshot = self.snapshot(key)?;
        withdraw_amounts(&snapshot, shares)
    }

    /// Burn `shares` for a pro-rata slice of both reserves
    pub fn withdraw_liquidity(
        &mut self,
        key: &PoolKey,
        holder: Pubkey,
        shares: u64,
        min_a: u64,
        min_b: u64,
    ) -> CoreResult<WithdrawQuote> {
        let state = self.state(key)?;
        let record = state.record;
        let authority = self.authority(&record)?;
        let snapshot = self.read_snapshot(state);

        let share_account = record.share_account(holder);
        if self.custody.balance(&share_account) < shares {
            return Err(CpmmCoreError::InsufficientShares);
        }

        let quote = withdraw_amounts(&snapshot, shares)?;
        enforce_min_withdrawal(&quote, min_a, min_b)?;
        let mut ledger = state.ledger;
        ledger.burn(shares)?;

        let movements = [
            Movement::BurnShares {
                from: share_account,
                amount: shares,
                signer: holder,
            },
            Movement::Transfer {
                from: record.custody_a,
                to: CustodyAccount::new(holder, key.asset_a()),
                amount: quote.amount_a,
                signer: authority.address(),
            },
            Movement::Transfer {
                from: record.custody_b,
                to: CustodyAccount::new(holder, key.asset_b()),
                amount: quote.amount_b,
                signer: authority.address(),
            },
        ];
        self.custody.execute(&movements).inspect_err(|err| {
            warn!(%holder, %err, "withdrawal rejected by custody");
        })?;
        self.commit_ledger(key, ledger)?;

        info!(
            %holder,
            shares,
            amount_a = quote.amount_a,
            amount_b = quote.amount_b,
            "liquidity withdrawn"
        );
        Ok(quote)
    }

    // ========================================================================
    // Swaps
    // ========================================================================

    pub fn quote_swap(
        &self,
        key: &PoolKey,
        direction: SwapDirection,
        amount_in: u64,
    ) -> CoreResult<SwapQuote> {
        let fee_bps = self.fee_bps(key)?;
        let snapshot = self.snapshot(key)?;
        let (reserve_in, reserve_out) = direction.orient(snapshot.reserve_a, snapshot.reserve_b);
        swap_output(direction, reserve_in, reserve_out, amount_in, fee_bps)
    }

    /// Sell exactly `amount_in` for at least `min_output`
    pub fn swap_exact_tokens_for_tokens(
        &mut self,
        key: &PoolKey,
        trader: Pubkey,
        direction: SwapDirection,
        amount_in: u64,
        min_output: u64,
    ) -> CoreResult<SwapQuote> {
        let fee_bps = self.fee_bps(key)?;
        let state = self.state(key)?;
        let record = state.record;
        let authority = self.authority(&record)?;
        let snapshot = self.read_snapshot(state);

        let (reserve_in, reserve_out) = direction.orient(snapshot.reserve_a, snapshot.reserve_b);
        let quote = swap_output(direction, reserve_in, reserve_out, amount_in, fee_bps)?;
        enforce_min_output(&quote, min_output).inspect_err(|_| {
            debug!(
                amount_out = quote.amount_out,
                min_output, "swap below minimum output"
            );
        })?;

        let (custody_in, custody_out) = record.custody_for(direction);
        let movements = [
            Movement::Transfer {
                from: CustodyAccount::new(trader, custody_in.asset),
                to: custody_in,
                amount: quote.amount_in,
                signer: trader,
            },
            Movement::Transfer {
                from: custody_out,
                to: CustodyAccount::new(trader, custody_out.asset),
                amount: quote.amount_out,
                signer: authority.address(),
            },
        ];
        self.custody.execute(&movements).inspect_err(|err| {
            warn!(%trader, %err, "swap rejected by custody");
        })?;

        info!(
            %trader,
            ?direction,
            amount_in = quote.amount_in,
            fee = quote.fee,
            amount_out = quote.amount_out,
            "swap executed"
        );
        Ok(quote)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn state(&self, key: &PoolKey) -> CoreResult<&PoolState> {
        self.pools.get(key).ok_or(CpmmCoreError::PoolNotFound)
    }

    fn read_snapshot(&self, state: &PoolState) -> PoolSnapshot {
        PoolSnapshot {
            reserve_a: self.custody.balance(&state.record.custody_a),
            reserve_b: self.custody.balance(&state.record.custody_b),
            total_supply: state.ledger.total_supply,
        }
    }

    fn fee_bps(&self, key: &PoolKey) -> CoreResult<u16> {
        self.registries
            .get(&key.registry())
            .map(|entry| entry.fee_bps)
            .ok_or(CpmmCoreError::RegistryNotFound)
    }

    fn authority(&self, record: &PoolRecord) -> CoreResult<AuthorityCapability> {
        AuthorityCapability::reconstruct(
            &record.key,
            record.authority_bump,
            &record.authority,
            &self.config.program_id,
        )
    }

    fn commit_ledger(&mut self, key: &PoolKey, ledger: ShareLedger) -> CoreResult<()> {
        let state = self.pools.get_mut(key).ok_or(CpmmCoreError::PoolNotFound)?;
        state.ledger = ledger;
        Ok(())
    }
}
