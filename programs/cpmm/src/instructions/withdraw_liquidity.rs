use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token::{Mint, Token, TokenAccount},
};
use cpmm_core::{
    math::{enforce_min_withdrawal, withdraw_amounts},
    PoolSnapshot,
};

use crate::{
    constants::{AUTHORITY_SEED, LIQUIDITY_SEED},
    error::CpmmError,
    events::LiquidityWithdrawn,
    state::Pool,
    utils::{burn_shares, transfer_from_vault_to_user, AuthoritySeeds},
};

#[derive(Accounts)]
pub struct WithdrawLiquidity<'info> {
    #[account(
        seeds = [pool.amm.as_ref(), pool.mint_a.as_ref(), pool.mint_b.as_ref()],
        bump = pool.bump,
        has_one = mint_a @ CpmmError::InvalidMint,
        has_one = mint_b @ CpmmError::InvalidMint,
        has_one = mint_liquidity @ CpmmError::InvalidMint,
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

    pub depositor: Signer<'info>,

    #[account(
        mut,
        seeds = [
            pool.amm.as_ref(),
            mint_a.key().as_ref(),
            mint_b.key().as_ref(),
            LIQUIDITY_SEED,
        ],
        bump
    )]
    pub mint_liquidity: Box<Account<'info, Mint>>,

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
        mut,
        associated_token::mint = mint_liquidity,
        associated_token::authority = depositor,
    )]
    pub depositor_account_liquidity: Box<Account<'info, TokenAccount>>,

    #[account(
        init_if_needed,
        payer = payer,
        associated_token::mint = mint_a,
        associated_token::authority = depositor,
    )]
    pub depositor_account_a: Box<Account<'info, TokenAccount>>,

    #[account(
        init_if_needed,
        payer = payer,
        associated_token::mint = mint_b,
        associated_token::authority = depositor,
    )]
    pub depositor_account_b: Box<Account<'info, TokenAccount>>,

    #[account(mut)]
    pub payer: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

pub fn withdraw_liquidity(
    ctx: Context<WithdrawLiquidity>,
    shares: u64,
    min_amount_a: u64,
    min_amount_b: u64,
) -> Result<()> {
    let capability = ctx.accounts.pool.capability(ctx.program_id)?;

    let snapshot = PoolSnapshot {
        reserve_a: ctx.accounts.pool_account_a.amount,
        reserve_b: ctx.accounts.pool_account_b.amount,
        total_supply: ctx.accounts.mint_liquidity.supply,
    };
    require!(
        ctx.accounts.depositor_account_liquidity.amount >= shares,
        CpmmError::InsufficientShares
    );
    let quote = withdraw_amounts(&snapshot, shares).map_err(CpmmError::from)?;
    enforce_min_withdrawal(&quote, min_amount_a, min_amount_b).map_err(CpmmError::from)?;

    let accounts = &ctx.accounts;
    burn_shares(
        &accounts.mint_liquidity,
        &accounts.depositor_account_liquidity,
        &accounts.depositor,
        &accounts.token_program,
        shares,
    )?;

    let seeds = AuthoritySeeds::new(&accounts.pool, &capability);
    let seeds = seeds.seeds();
    let signer_seeds = &[&seeds[..]];
    transfer_from_vault_to_user(
        &accounts.pool_account_a,
        &accounts.depositor_account_a,
        &accounts.pool_authority,
        &accounts.token_program,
        signer_seeds,
        quote.amount_a,
    )?;
    transfer_from_vault_to_user(
        &accounts.pool_account_b,
        &accounts.depositor_account_b,
        &accounts.pool_authority,
        &accounts.token_program,
        signer_seeds,
        quote.amount_b,
    )?;

    ctx.accounts.pool_account_a.reload()?;
    ctx.accounts.pool_account_b.reload()?;

    msg!(
        "Burned {} shares for {} A and {} B",
        shares,
        quote.amount_a,
        quote.amount_b
    );
    emit!(LiquidityWithdrawn {
        pool: ctx.accounts.pool.key(),
        depositor: ctx.accounts.depositor.key(),
        shares,
        amount_a: quote.amount_a,
        amount_b: quote.amount_b,
        reserve_a: ctx.accounts.pool_account_a.amount,
        reserve_b: ctx.accounts.pool_account_b.amount,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
