use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token::{Mint, Token, TokenAccount},
};
use cpmm_core::{
    math::{check_invariant, enforce_min_output, swap_output},
    SwapDirection,
};

use crate::{
    constants::AUTHORITY_SEED,
    error::CpmmError,
    events::SwapExecuted,
    state::{Amm, Pool},
    utils::{transfer_from_user_to_vault, transfer_from_vault_to_user, AuthoritySeeds},
};

#[derive(Accounts)]
pub struct SwapExactTokensForTokens<'info> {
    #[account(
        seeds = [amm.id.as_ref()],
        bump = amm.bump
    )]
    pub amm: Box<Account<'info, Amm>>,

    #[account(
        seeds = [pool.amm.as_ref(), pool.mint_a.as_ref(), pool.mint_b.as_ref()],
        bump = pool.bump,
        has_one = amm @ CpmmError::RegistryNotFound,
        has_one = mint_a @ CpmmError::InvalidMint,
        has_one = mint_b @ CpmmError::InvalidMint,
        has_one = pool_authority @ CpmmError::InvalidAuthority,
    )]
    pub pool: Box<Account<'info, Pool>>,

    /// CHECK: PDA signer for the vaults
    #[account(
        seeds = [
            pool.amm.as_ref(),
            mint_a.key().as_ref(),
            mint_b.key().as_ref(),
            AUTHORITY_SEED,
        ],
        bump = pool.authority_bump
    )]
    pub pool_authority: UncheckedAccount<'info>,

    pub trader: Signer<'info>,

    pub mint_a: Box<Account<'info, Mint>>,
    pub mint_b: Box<Account<'info, Mint>>,

    #[account(
        mut,
        associated_token::mint = mint_a,
        associated_token::authority = pool_authority,
    )]
    pub pool_account_a: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        associated_token::mint = mint_b,
        associated_token::authority = pool_authority,
    )]
    pub pool_account_b: Box<Account<'info, TokenAccount>>,

    #[account(
        init_if_needed,
        payer = payer,
        associated_token::mint = mint_a,
        associated_token::authority = trader,
    )]
    pub trader_account_a: Box<Account<'info, TokenAccount>>,

    #[account(
        init_if_needed,
        payer = payer,
        associated_token::mint = mint_b,
        associated_token::authority = trader,
    )]
    pub trader_account_b: Box<Account<'info, TokenAccount>>,

    #[account(mut)]
    pub payer: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

pub fn swap_exact_tokens_for_tokens(
    ctx: Context<SwapExactTokensForTokens>,
    swap_a: bool,
    input_amount: u64,
    min_output_amount: u64,
) -> Result<()> {
    let direction = SwapDirection::from_swap_a(swap_a);
    let capability = ctx.accounts.pool.capability(ctx.program_id)?;

    let (reserve_in, reserve_out) = direction.orient(
        ctx.accounts.pool_account_a.amount,
        ctx.accounts.pool_account_b.amount,
    );
    let quote = swap_output(
        direction,
        reserve_in,
        reserve_out,
        input_amount,
        ctx.accounts.amm.fee_bps,
    )
    .map_err(CpmmError::from)?;
    enforce_min_output(&quote, min_output_amount).map_err(CpmmError::from)?;

    let accounts = &ctx.accounts;
    let (trader_in, trader_out) =
        direction.orient(&accounts.trader_account_a, &accounts.trader_account_b);
    let (vault_in, vault_out) =
        direction.orient(&accounts.pool_account_a, &accounts.pool_account_b);
    require!(
        trader_in.amount >= quote.amount_in,
        CpmmError::InsufficientBalance
    );
    let (mint_in, mint_out) = (trader_in.mint, trader_out.mint);

    transfer_from_user_to_vault(
        trader_in,
        vault_in,
        &accounts.trader,
        &accounts.token_program,
        quote.amount_in,
    )?;

    let seeds = AuthoritySeeds::new(&accounts.pool, &capability);
    let seeds = seeds.seeds();
    transfer_from_vault_to_user(
        vault_out,
        trader_out,
        &accounts.pool_authority,
        &accounts.token_program,
        &[&seeds[..]],
        quote.amount_out,
    )?;

    msg!(
        "Traded {} tokens ({} after fees) for {}",
        quote.amount_in,
        quote.effective_in,
        quote.amount_out
    );

    // Re-check the curve against the balances the token program reports
    ctx.accounts.pool_account_a.reload()?;
    ctx.accounts.pool_account_b.reload()?;
    let (after_in, after_out) = direction.orient(
        ctx.accounts.pool_account_a.amount,
        ctx.accounts.pool_account_b.amount,
    );
    let received = after_in
        .checked_sub(reserve_in)
        .ok_or(CpmmError::InvariantViolated)?;
    let paid = reserve_out
        .checked_sub(after_out)
        .ok_or(CpmmError::InvariantViolated)?;
    check_invariant(reserve_in, reserve_out, received, paid).map_err(CpmmError::from)?;

    emit!(SwapExecuted {
        pool: ctx.accounts.pool.key(),
        trader: ctx.accounts.trader.key(),
        mint_in,
        mint_out,
        amount_in: quote.amount_in,
        amount_out: quote.amount_out,
        fee_paid: quote.fee,
        reserve_a: ctx.accounts.pool_account_a.amount,
        reserve_b: ctx.accounts.pool_account_b.amount,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
