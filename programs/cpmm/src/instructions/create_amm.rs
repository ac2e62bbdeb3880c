use anchor_lang::prelude::*;
use cpmm_core::RegistryEntry;

use crate::{error::CpmmError, events::AmmCreated, state::Amm};

#[derive(Accounts)]
#[instruction(id: Pubkey, fee_bps: u16)]
pub struct CreateAmm<'info> {
    #[account(
        init,
        payer = payer,
        space = 8 + Amm::INIT_SPACE,
        seeds = [id.as_ref()],
        bump
    )]
    pub amm: Account<'info, Amm>,

    /// Registry admin
    /// CHECK: Only recorded; never read or written
    pub admin: UncheckedAccount<'info>,

    #[account(mut)]
    pub payer: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn create_amm(ctx: Context<CreateAmm>, id: Pubkey, fee_bps: u16) -> Result<()> {
    let entry = RegistryEntry::new(id, ctx.accounts.admin.key(), fee_bps).map_err(CpmmError::from)?;

    let amm = &mut ctx.accounts.amm;
    amm.id = entry.id;
    amm.admin = entry.admin;
    amm.fee_bps = entry.fee_bps;
    amm.bump = ctx.bumps.amm;

    msg!("Created registry {} with fee {} bps", amm.key(), fee_bps);
    emit!(AmmCreated {
        amm: amm.key(),
        id,
        admin: entry.admin,
        fee_bps,
    });

    Ok(())
}
