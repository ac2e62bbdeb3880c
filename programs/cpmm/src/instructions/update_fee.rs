use anchor_lang::prelude::*;

use crate::{events::FeeUpdated, state::Amm};

#[derive(Accounts)]
pub struct UpdateFee<'info> {
    #[account(
        mut,
        seeds = [amm.id.as_ref()],
        bump = amm.bump
    )]
    pub amm: Account<'info, Amm>,

    pub admin: Signer<'info>,
}

pub fn update_fee(ctx: Context<UpdateFee>, fee_bps: u16) -> Result<()> {
    let admin = ctx.accounts.admin.key();
    let amm = &mut ctx.accounts.amm;
    let old_fee_bps = amm.fee_bps;

    amm.set_fee(&admin, fee_bps)?;

    msg!("Fee updated from {} to {} bps", old_fee_bps, fee_bps);
    emit!(FeeUpdated {
        amm: amm.key(),
        old_fee_bps,
        new_fee_bps: fee_bps,
    });

    Ok(())
}
