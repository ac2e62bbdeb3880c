//! Token transfer utilities
//!
//! CPI wrappers for the four movements a pool performs: user deposits into a
//! vault, vault payouts, share mints and share burns.

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Burn, Mint, MintTo, Token, TokenAccount, Transfer};

/// Move a depositor's or trader's tokens into one of the authority's reserve
/// accounts. The owner signs; no PDA seeds are involved.
pub fn transfer_from_user_to_vault<'info>(
    source: &Account<'info, TokenAccount>,
    reserve: &Account<'info, TokenAccount>,
    owner: &Signer<'info>,
    token_program: &Program<'info, Token>,
    amount: u64,
) -> Result<()> {
    let cpi_accounts = Transfer {
        from: source.to_account_info(),
        to: reserve.to_account_info(),
        authority: owner.to_account_info(),
    };
    let cpi_ctx = CpiContext::new(token_program.to_account_info(), cpi_accounts);
    token::transfer(cpi_ctx, amount)
}

/// Pay out of a reserve account, signed by the pool authority PDA with the
/// seeds from [`AuthoritySeeds`](crate::utils::AuthoritySeeds)
pub fn transfer_from_vault_to_user<'info>(
    reserve: &Account<'info, TokenAccount>,
    destination: &Account<'info, TokenAccount>,
    pool_authority: &AccountInfo<'info>,
    token_program: &Program<'info, Token>,
    signer_seeds: &[&[&[u8]]],
    amount: u64,
) -> Result<()> {
    let cpi_accounts = Transfer {
        from: reserve.to_account_info(),
        to: destination.to_account_info(),
        authority: pool_authority.to_account_info(),
    };
    let cpi_ctx =
        CpiContext::new_with_signer(token_program.to_account_info(), cpi_accounts, signer_seeds);
    token::transfer(cpi_ctx, amount)
}

/// Mint liquidity shares with the pool authority
pub fn mint_shares<'info>(
    mint: &Account<'info, Mint>,
    to: &Account<'info, TokenAccount>,
    mint_authority: &AccountInfo<'info>,
    token_program: &Program<'info, Token>,
    authority_seeds: &[&[&[u8]]],
    amount: u64,
) -> Result<()> {
    let cpi_accounts = MintTo {
        mint: mint.to_account_info(),
        to: to.to_account_info(),
        authority: mint_authority.to_account_info(),
    };
    let cpi_ctx = CpiContext::new_with_signer(
        token_program.to_account_info(),
        cpi_accounts,
        authority_seeds,
    );
    token::mint_to(cpi_ctx, amount)
}

/// Burn liquidity shares from the holder's account
pub fn burn_shares<'info>(
    mint: &Account<'info, Mint>,
    from: &Account<'info, TokenAccount>,
    owner: &Signer<'info>,
    token_program: &Program<'info, Token>,
    amount: u64,
) -> Result<()> {
    let cpi_accounts = Burn {
        mint: mint.to_account_info(),
        from: from.to_account_info(),
        authority: owner.to_account_info(),
    };
    let cpi_ctx = CpiContext::new(token_program.to_account_info(), cpi_accounts);
    token::burn(cpi_ctx, amount)
}
