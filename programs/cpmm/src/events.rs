//! Event definitions

use anchor_lang::prelude::*;

/// Event emitted when a registry is created
#[event]
pub struct AmmCreated {
    pub amm: Pubkey,
    pub id: Pubkey,
    pub admin: Pubkey,
    pub fee_bps: u16,
}

#[event]
pub struct FeeUpdated {
    pub amm: Pubkey,
    pub old_fee_bps: u16,
    pub new_fee_bps: u16,
}

/// Event emitted when a pool and its liquidity mint are created
#[event]
pub struct PoolCreated {
    pub amm: Pubkey,
    pub pool: Pubkey,
    pub mint_a: Pubkey,
    pub mint_b: Pubkey,
    pub mint_liquidity: Pubkey,
    pub pool_authority: Pubkey,
}

#[event]
pub struct LiquidityDeposited {
    pub pool: Pubkey,
    pub depositor: Pubkey,
    pub amount_a: u64,
    pub amount_b: u64,
    pub shares: u64,
    pub reserve_a: u64,
    pub reserve_b: u64,
    pub timestamp: i64,
}

#[event]
pub struct LiquidityWithdrawn {
    pub pool: Pubkey,
    pub depositor: Pubkey,
    pub shares: u64,
    pub amount_a: u64,
    pub amount_b: u64,
    pub reserve_a: u64,
    pub reserve_b: u64,
    pub timestamp: i64,
}

/// Event emitted when a swap is executed
#[event]
pub struct SwapExecuted {
    pub pool: Pubkey,
    pub trader: Pubkey,
    pub mint_in: Pubkey,
    pub mint_out: Pubkey,
    pub amount_in: u64,
    pub amount_out: u64,
    pub fee_paid: u64,
    pub reserve_a: u64,
    pub reserve_b: u64,
    pub timestamp: i64,
}
