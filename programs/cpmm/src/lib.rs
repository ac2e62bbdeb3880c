#![allow(unexpected_cfgs)]
#![allow(clippy::result_large_err)]
use anchor_lang::prelude::*;

pub mod constants;
pub mod error;
pub mod events;
pub mod instructions;
pub mod state;
pub mod utils;

use instructions::*;

#[cfg(test)]
mod tests;

declare_id!("qJTj6ZdX7BbkNhLQPwoSDNQfn2vHtWimpbrn2yPhYxo");

#[program]
pub mod cpmm {
    use super::*;

    pub fn create_amm(ctx: Context<CreateAmm>, id: Pubkey, fee_bps: u16) -> Result<()> {
        instructions::create_amm(ctx, id, fee_bps)
    }

    pub fn update_fee(ctx: Context<UpdateFee>, fee_bps: u16) -> Result<()> {
        instructions::update_fee(ctx, fee_bps)
    }

    pub fn create_pool(ctx: Context<CreatePool>) -> Result<()> {
        instructions::create_pool(ctx)
    }

    pub fn deposit_liquidity(
        ctx: Context<DepositLiquidity>,
        amount_a: u64,
        amount_b: u64,
    ) -> Result<()> {
        instructions::deposit_liquidity(ctx, amount_a, amount_b)
    }

    pub fn withdraw_liquidity(
        ctx: Context<WithdrawLiquidity>,
        shares: u64,
        min_amount_a: u64,
        min_amount_b: u64,
    ) -> Result<()> {
        instructions::withdraw_liquidity(ctx, shares, min_amount_a, min_amount_b)
    }

    pub fn swap_exact_tokens_for_tokens(
        ctx: Context<SwapExactTokensForTokens>,
        swap_a: bool,
        input_amount: u64,
        min_output_amount: u64,
    ) -> Result<()> {
        instructions::swap_exact_tokens_for_tokens(ctx, swap_a, input_amount, min_output_amount)
    }
}
