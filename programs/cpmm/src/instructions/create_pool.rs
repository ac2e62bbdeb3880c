use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token::{Mint, Token, TokenAccount},
};
use cpmm_core::{authority::AuthorityCapability, validate_canonical_order, PoolKey};

use crate::{
    constants::{AUTHORITY_SEED, LIQUIDITY_DECIMALS, LIQUIDITY_SEED},
    error::CpmmError,
    events::PoolCreated,
    state::{Amm, Pool},
};

#[derive(Accounts)]
pub struct CreatePool<'info> {
    #[account(
        seeds = [amm.id.as_ref()],
        bump = amm.bump
    )]
    pub amm: Box<Account<'info, Amm>>,

    /// Token A mint (ordered: mint_a < mint_b)
    pub mint_a: Box<Account<'info, Mint>>,

    /// Token B mint (ordered: mint_a < mint_b)
    #[account(
        constraint = mint_a.key() != mint_b.key() @ CpmmError::IdenticalMints,
        constraint = mint_a.key() < mint_b.key() @ CpmmError::NonCanonicalMintOrder,
    )]
    pub mint_b: Box<Account<'info, Mint>>,

    #[account(
        init,
        payer = payer,
        space = 8 + Pool::INIT_SPACE,
        seeds = [amm.key().as_ref(), mint_a.key().as_ref(), mint_b.key().as_ref()],
        bump
    )]
    pub pool: Box<Account<'info, Pool>>,

    /// CHECK: PDA signer for the vaults and the liquidity mint
    #[account(
        seeds = [
            amm.key().as_ref(),
            mint_a.key().as_ref(),
            mint_b.key().as_ref(),
            AUTHORITY_SEED,
        ],
        bump
    )]
    pub pool_authority: UncheckedAccount<'info>,

    #[account(
        init,
        payer = payer,
        seeds = [
            amm.key().as_ref(),
            mint_a.key().as_ref(),
            mint_b.key().as_ref(),
            LIQUIDITY_SEED,
        ],
        bump,
        mint::decimals = LIQUIDITY_DECIMALS,
        mint::authority = pool_authority,
    )]
    pub mint_liquidity: Box<Account<'info, Mint>>,

    #[account(
        init,
        payer = payer,
        associated_token::mint = mint_a,
        associated_token::authority = pool_authority,
    )]
    pub pool_account_a: Box<Account<'info, TokenAccount>>,

    #[account(
        init,
        payer = payer,
        associated_token::mint = mint_b,
        associated_token::authority = pool_authority,
    )]
    pub pool_account_b: Box<Account<'info, TokenAccount>>,

    #[account(mut)]
    pub payer: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

pub fn create_pool(ctx: Context<CreatePool>) -> Result<()> {
    let amm = ctx.accounts.amm.key();
    let mint_a = ctx.accounts.mint_a.key();
    let mint_b = ctx.accounts.mint_b.key();
    validate_canonical_order(&mint_a, &mint_b).map_err(CpmmError::from)?;

    let key = PoolKey::new(amm, mint_a, mint_b).map_err(CpmmError::from)?;
    let capability = AuthorityCapability::derive(&key, ctx.program_id);
    require_keys_eq!(
        capability.address(),
        ctx.accounts.pool_authority.key(),
        CpmmError::InvalidAuthority
    );

    let pool = &mut ctx.accounts.pool;
    pool.amm = amm;
    pool.mint_a = mint_a;
    pool.mint_b = mint_b;
    pool.mint_liquidity = ctx.accounts.mint_liquidity.key();
    pool.pool_authority = capability.address();
    pool.authority_bump = capability.bump();
    pool.bump = ctx.bumps.pool;

    msg!("Created pool {} for {} / {}", pool.key(), mint_a, mint_b);
    emit!(PoolCreated {
        amm,
        pool: pool.key(),
        mint_a,
        mint_b,
        mint_liquidity: pool.mint_liquidity,
        pool_authority: pool.pool_authority,
    });

    Ok(())
}
