//! End-to-end instruction flows through the off-chain engine

mod common;

use common::{TestContext, FUNDING};
use cpmm_core::custody::{Custody, InMemoryCustody};
use cpmm_core::engine::{Amm, EngineConfig};
use cpmm_core::math::InitialSharePolicy;
use cpmm_core::{CpmmCoreError, PoolPhase, Pubkey, SwapDirection, MINIMUM_LIQUIDITY};

// ============================================================================
// Registry
// ============================================================================

#[test]
fn test_create_amm_validation() {
    common::init_test_tracing();
    let mut amm = Amm::new(
        EngineConfig::new(Pubkey::new_unique()),
        InMemoryCustody::new(),
    );
    let (id, admin) = (Pubkey::new_unique(), Pubkey::new_unique());

    assert_eq!(
        amm.create_amm(id, admin, 10_000),
        Err(CpmmCoreError::InvalidFeeRate)
    );
    let registry = amm.create_amm(id, admin, 9_999).unwrap();
    assert_eq!(amm.registry(&registry).unwrap().fee_bps, 9_999);
    assert_eq!(
        amm.create_amm(id, Pubkey::new_unique(), 30),
        Err(CpmmCoreError::DuplicateRegistryId)
    );
}

#[test]
fn test_fee_update_is_admin_gated_and_applies_to_next_swap() {
    let mut ctx = TestContext::new(30);
    let lp = ctx.funded_user();
    ctx.amm
        .deposit_liquidity(&ctx.key, lp, 1_000_000, 1_000_000)
        .unwrap();

    let stranger = Pubkey::new_unique();
    assert_eq!(
        ctx.amm.update_fee(&ctx.registry, &stranger, 0),
        Err(CpmmCoreError::Unauthorized)
    );
    assert_eq!(
        ctx.amm.update_fee(&ctx.registry, &ctx.admin, 10_000),
        Err(CpmmCoreError::InvalidFeeRate)
    );
    assert_eq!(
        ctx.amm
            .update_fee(&Pubkey::new_unique(), &ctx.admin, 0),
        Err(CpmmCoreError::RegistryNotFound)
    );

    let before = ctx.amm.quote_swap(&ctx.key, SwapDirection::AToB, 10_000).unwrap();
    assert_eq!(before.fee, 30);

    ctx.amm.update_fee(&ctx.registry, &ctx.admin, 0).unwrap();
    let after = ctx.amm.quote_swap(&ctx.key, SwapDirection::AToB, 10_000).unwrap();
    assert_eq!(after.fee, 0);
    assert_eq!(after.effective_in, 10_000);
    assert!(after.amount_out > before.amount_out);
}

// ============================================================================
// Pools
// ============================================================================

#[test]
fn test_create_pool_validation() {
    let mut ctx = TestContext::new(30);
    let (a, b) = (ctx.key.asset_a(), ctx.key.asset_b());

    assert_eq!(
        ctx.amm.create_pool(Pubkey::new_unique(), a, b),
        Err(CpmmCoreError::RegistryNotFound)
    );
    assert_eq!(
        ctx.amm.create_pool(ctx.registry, a, a),
        Err(CpmmCoreError::IdenticalAssets)
    );
    assert_eq!(
        ctx.amm.create_pool(ctx.registry, b, a),
        Err(CpmmCoreError::PoolAlreadyExists)
    );

    assert_eq!(ctx.amm.pool_key(ctx.registry, b, a), Ok(ctx.key));
    assert_eq!(
        ctx.amm
            .pool_key(ctx.registry, a, Pubkey::new_unique()),
        Err(CpmmCoreError::PoolNotFound)
    );

    // Same pair under another registry is a different pool
    let other = ctx
        .amm
        .create_amm(Pubkey::new_unique(), ctx.admin, 30)
        .unwrap();
    let record = ctx.amm.create_pool(other, b, a).unwrap();
    assert_ne!(record.authority, ctx.amm.pool(&ctx.key).unwrap().authority);
}

#[test]
fn test_new_pool_is_empty() {
    let ctx = TestContext::new(30);
    assert_eq!(ctx.amm.phase(&ctx.key), Ok(PoolPhase::Empty));

    let record = ctx.amm.pool(&ctx.key).unwrap();
    assert_eq!(record.custody_a.owner, record.authority);
    assert_eq!(record.custody_b.asset, ctx.key.asset_b());
    assert_eq!(ctx.amm.custody().supply(&record.share_asset), 0);
}

// ============================================================================
// Liquidity
// ============================================================================

#[test]
fn test_imbalanced_deposit_draws_only_proportional_amounts() {
    let mut ctx = TestContext::new(30);
    let lp = ctx.funded_user();
    let first = ctx
        .amm
        .deposit_liquidity(&ctx.key, lp, 1_000_000, 4_000_000)
        .unwrap();
    assert_eq!(first.shares, 2_000_000);
    assert_eq!(ctx.amm.phase(&ctx.key), Ok(PoolPhase::Active));

    let user = ctx.funded_user();
    let quote = ctx
        .amm
        .deposit_liquidity(&ctx.key, user, 500_000, 500_000)
        .unwrap();
    assert_eq!(quote.shares, 250_000);
    assert_eq!(quote.amount_a, 125_000);
    assert_eq!(quote.amount_b, 500_000);

    assert_eq!(ctx.balance_a(user), FUNDING - 125_000);
    assert_eq!(ctx.balance_b(user), FUNDING - 500_000);
    assert_eq!(ctx.amm.share_balance(&ctx.key, &user), Ok(250_000));
    assert_eq!(ctx.amm.ledger(&ctx.key).unwrap().total_supply, 2_250_000);

    // Withdrawing straight away returns exactly what was drawn
    let withdrawal = ctx
        .amm
        .withdraw_liquidity(&ctx.key, user, 250_000, 125_000, 500_000)
        .unwrap();
    assert_eq!(withdrawal.amount_a, 125_000);
    assert_eq!(withdrawal.amount_b, 500_000);
    assert_eq!(ctx.balance_a(user), FUNDING);
    assert_eq!(ctx.balance_b(user), FUNDING);
}

#[test]
fn test_failed_deposit_leaves_state_unchanged() {
    let mut ctx = TestContext::new(30);
    let lp = ctx.funded_user();
    ctx.amm
        .deposit_liquidity(&ctx.key, lp, 1_000_000, 1_000_000)
        .unwrap();

    let before = ctx.amm.snapshot(&ctx.key).unwrap();
    let broke = Pubkey::new_unique();
    ctx.amm
        .custody_mut()
        .credit(broke, ctx.key.asset_a(), 1_000)
        .unwrap();

    assert_eq!(
        ctx.amm.deposit_liquidity(&ctx.key, broke, 1_000, 1_000),
        Err(CpmmCoreError::InsufficientBalance)
    );
    assert_eq!(ctx.amm.snapshot(&ctx.key).unwrap(), before);
    assert_eq!(ctx.balance_a(broke), 1_000);
    assert_eq!(ctx.amm.share_balance(&ctx.key, &broke), Ok(0));
}

#[test]
fn test_withdraw_rejections() {
    let mut ctx = TestContext::new(30);
    let lp = ctx.funded_user();
    ctx.amm
        .deposit_liquidity(&ctx.key, lp, 1_000_000, 1_000_000)
        .unwrap();
    let before = ctx.amm.snapshot(&ctx.key).unwrap();

    assert_eq!(
        ctx.amm
            .withdraw_liquidity(&ctx.key, Pubkey::new_unique(), 1, 0, 0),
        Err(CpmmCoreError::InsufficientShares)
    );
    assert_eq!(
        ctx.amm
            .withdraw_liquidity(&ctx.key, lp, 1_000_001, 0, 0),
        Err(CpmmCoreError::InsufficientShares)
    );
    assert_eq!(
        ctx.amm.withdraw_liquidity(&ctx.key, lp, 0, 0, 0),
        Err(CpmmCoreError::ZeroWithdrawal)
    );
    assert_eq!(
        ctx.amm
            .withdraw_liquidity(&ctx.key, lp, 500_000, 500_001, 0),
        Err(CpmmCoreError::SlippageExceeded)
    );
    assert_eq!(ctx.amm.snapshot(&ctx.key).unwrap(), before);
}

#[test]
fn test_drained_pool_can_be_repriced() {
    let mut ctx = TestContext::new(30);
    let lp = ctx.funded_user();
    ctx.amm
        .deposit_liquidity(&ctx.key, lp, 1_000_000, 1_000_000)
        .unwrap();
    ctx.amm
        .withdraw_liquidity(&ctx.key, lp, 1_000_000, 0, 0)
        .unwrap();
    assert_eq!(ctx.amm.phase(&ctx.key), Ok(PoolPhase::Empty));

    let quote = ctx
        .amm
        .deposit_liquidity(&ctx.key, lp, 100, 400)
        .unwrap();
    assert_eq!(quote.shares, 200);
}

#[test]
fn test_locked_minimum_policy() {
    let config = EngineConfig::new(Pubkey::new_unique())
        .with_share_policy(InitialSharePolicy::locked_minimum());
    let mut ctx = TestContext::with_config(config, 30);
    let lp = ctx.funded_user();

    assert_eq!(
        ctx.amm.deposit_liquidity(&ctx.key, lp, 100, 100),
        Err(CpmmCoreError::DepositTooSmall)
    );

    let quote = ctx
        .amm
        .deposit_liquidity(&ctx.key, lp, 1_000, 1_000)
        .unwrap();
    assert_eq!(quote.shares, 1_000 - MINIMUM_LIQUIDITY);
    assert_eq!(quote.locked_shares, MINIMUM_LIQUIDITY);
    assert_eq!(ctx.amm.ledger(&ctx.key).unwrap().total_supply, 1_000);

    let withdrawal = ctx
        .amm
        .withdraw_liquidity(&ctx.key, lp, 900, 0, 0)
        .unwrap();
    assert_eq!(withdrawal.amount_a, 900);

    // Locked shares keep the pool priced
    let snapshot = ctx.amm.snapshot(&ctx.key).unwrap();
    assert_eq!(snapshot.total_supply, MINIMUM_LIQUIDITY);
    assert_eq!(snapshot.reserve_a, 100);
    assert_eq!(ctx.amm.phase(&ctx.key), Ok(PoolPhase::Active));
}

#[test]
fn test_donation_without_shares_is_unbalanced() {
    let mut ctx = TestContext::new(30);
    let custody_a = ctx.amm.pool(&ctx.key).unwrap().custody_a;
    ctx.amm
        .custody_mut()
        .credit(custody_a.owner, custody_a.asset, 500)
        .unwrap();
    assert_eq!(ctx.amm.phase(&ctx.key), Ok(PoolPhase::Unbalanced));
}

// ============================================================================
// Swaps
// ============================================================================

#[test]
fn test_swap_requires_liquidity() {
    let mut ctx = TestContext::new(30);
    let trader = ctx.funded_user();
    assert_eq!(
        ctx.amm
            .swap_exact_tokens_for_tokens(&ctx.key, trader, SwapDirection::AToB, 1_000, 0),
        Err(CpmmCoreError::PoolNotInitialized)
    );
}

#[test]
fn test_swap_b_for_a() {
    let mut ctx = TestContext::new(30);
    let lp = ctx.funded_user();
    ctx.amm
        .deposit_liquidity(&ctx.key, lp, 1_000_000, 4_000_000)
        .unwrap();

    let trader = ctx.funded_user();
    let quote = ctx
        .amm
        .swap_exact_tokens_for_tokens(&ctx.key, trader, SwapDirection::BToA, 40_000, 9_871)
        .unwrap();
    assert_eq!(quote.effective_in, 39_880);
    assert_eq!(quote.amount_out, 9_871);

    assert_eq!(ctx.balance_a(trader), FUNDING + 9_871);
    assert_eq!(ctx.balance_b(trader), FUNDING - 40_000);

    let snapshot = ctx.amm.snapshot(&ctx.key).unwrap();
    assert_eq!(snapshot.reserve_a, 1_000_000 - 9_871);
    assert_eq!(snapshot.reserve_b, 4_040_000);
    assert!(
        snapshot.reserve_a as u128 * snapshot.reserve_b as u128 >= 1_000_000u128 * 4_000_000
    );
}

#[test]
fn test_swap_without_funds_is_rejected() {
    let mut ctx = TestContext::new(30);
    let lp = ctx.funded_user();
    ctx.amm
        .deposit_liquidity(&ctx.key, lp, 1_000_000, 1_000_000)
        .unwrap();
    let before = ctx.amm.snapshot(&ctx.key).unwrap();

    assert_eq!(
        ctx.amm.swap_exact_tokens_for_tokens(
            &ctx.key,
            Pubkey::new_unique(),
            SwapDirection::AToB,
            1_000,
            0
        ),
        Err(CpmmCoreError::InsufficientBalance)
    );
    assert_eq!(ctx.amm.snapshot(&ctx.key).unwrap(), before);
}

#[test]
fn test_fees_accrue_to_liquidity_providers() {
    let mut ctx = TestContext::new(300);
    let lp = ctx.funded_user();
    ctx.amm
        .deposit_liquidity(&ctx.key, lp, 1_000_000, 1_000_000)
        .unwrap();

    let trader = ctx.funded_user();
    for _ in 0..10 {
        ctx.amm
            .swap_exact_tokens_for_tokens(&ctx.key, trader, SwapDirection::AToB, 50_000, 0)
            .unwrap();
        ctx.amm
            .swap_exact_tokens_for_tokens(&ctx.key, trader, SwapDirection::BToA, 50_000, 0)
            .unwrap();
    }

    let withdrawal = ctx
        .amm
        .withdraw_liquidity(&ctx.key, lp, 1_000_000, 0, 0)
        .unwrap();
    let after = withdrawal.amount_a as u128 * withdrawal.amount_b as u128;
    assert!(after > 1_000_000u128 * 1_000_000);
}
