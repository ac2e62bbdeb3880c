use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token::{Mint, Token, TokenAccount},
};
use cpmm_core::{math::deposit_amounts, PoolSnapshot};

use crate::{
    constants::{AUTHORITY_SEED, LIQUIDITY_SEED, SHARE_POLICY},
    error::CpmmError,
    events::LiquidityDeposited,
    state::Pool,
    utils::{mint_shares, transfer_from_user_to_vault, AuthoritySeeds},
};

#[derive(Accounts)]
pub struct DepositLiquidity<'info> {
    #[account(
        seeds = [pool.amm.as_ref(), pool.mint_a.as_ref(), pool.mint_b.as_ref()],
        bump = pool.bump,
        has_one = mint_a @ CpmmError::InvalidMint,
        has_one = mint_b @ CpmmError::InvalidMint,
        has_one = mint_liquidity @ CpmmError::InvalidMint,
        has_one = pool_authority @ CpmmError::InvalidAuthority,
    )]
    pub pool: Box<Account<'info, Pool>>,

    /// CHECK: PDA signer for the liquidity mint
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
        init_if_needed,
        payer = payer,
        associated_token::mint = mint_liquidity,
        associated_token::authority = depositor,
    )]
    pub depositor_account_liquidity: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        associated_token::mint = mint_a,
        associated_token::authority = depositor,
    )]
    pub depositor_account_a: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
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

pub fn deposit_liquidity(
    ctx: Context<DepositLiquidity>,
    amount_a: u64,
    amount_b: u64,
) -> Result<()> {
    let capability = ctx.accounts.pool.capability(ctx.program_id)?;

    // One read of reserves and supply; everything below derives from it
    let snapshot = PoolSnapshot {
        reserve_a: ctx.accounts.pool_account_a.amount,
        reserve_b: ctx.accounts.pool_account_b.amount,
        total_supply: ctx.accounts.mint_liquidity.supply,
    };
    let quote =
        deposit_amounts(&snapshot, amount_a, amount_b, SHARE_POLICY).map_err(CpmmError::from)?;

    let accounts = &ctx.accounts;
    require!(
        accounts.depositor_account_a.amount >= quote.amount_a
            && accounts.depositor_account_b.amount >= quote.amount_b,
        CpmmError::InsufficientBalance
    );

    transfer_from_user_to_vault(
        &accounts.depositor_account_a,
        &accounts.pool_account_a,
        &accounts.depositor,
        &accounts.token_program,
        quote.amount_a,
    )?;
    transfer_from_user_to_vault(
        &accounts.depositor_account_b,
        &accounts.pool_account_b,
        &accounts.depositor,
        &accounts.token_program,
        quote.amount_b,
    )?;

    let seeds = AuthoritySeeds::new(&accounts.pool, &capability);
    let seeds = seeds.seeds();
    mint_shares(
        &accounts.mint_liquidity,
        &accounts.depositor_account_liquidity,
        &accounts.pool_authority,
        &accounts.token_program,
        &[&seeds[..]],
        quote.shares,
    )?;

    ctx.accounts.pool_account_a.reload()?;
    ctx.accounts.pool_account_b.reload()?;

    msg!(
        "Deposited {} A and {} B for {} shares",
        quote.amount_a,
        quote.amount_b,
        quote.shares
    );
    emit!(LiquidityDeposited {
        pool: ctx.accounts.pool.key(),
        depositor: ctx.accounts.depositor.key(),
        amount_a: quote.amount_a,
        amount_b: quote.amount_b,
        shares: quote.shares,
        reserve_a: ctx.accounts.pool_account_a.amount,
        reserve_b: ctx.accounts.pool_account_b.amount,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
