//! # Custody
//!
//! The token-transfer service the engine delegates to. On chain this is the
//! SPL token program; off chain [`InMemoryCustody`] stands in for it.
//!
//! Movements are submitted as a batch and either all apply or none do.

use std::collections::HashMap;

use solana_program::pubkey::Pubkey;

use crate::errors::{CoreResult, CpmmCoreError};
use crate::math::safe_math::{safe_add_u64, safe_sub_u64};

/// A balance of one asset held by one owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub struct CustodyAccount {
    pub owner: Pubkey,
    pub asset: Pubkey,
}

impl CustodyAccount {
    pub fn new(owner: Pubkey, asset: Pubkey) -> Self {
        Self { owner, asset }
    }
}

/// One step of a custody batch. `signer` must be the owner of the debited
/// account, or the registered minter for share mints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Transfer {
        from: CustodyAccount,
        to: CustodyAccount,
        amount: u64,
        signer: Pubkey,
    },
    MintShares {
        to: CustodyAccount,
        amount: u64,
        signer: Pubkey,
    },
    BurnShares {
        from: CustodyAccount,
        amount: u64,
        signer: Pubkey,
    },
}

/// External custody collaborator
pub trait Custody {
    /// Current balance; unknown accounts hold zero
    fn balance(&self, account: &CustodyAccount) -> u64;

    /// Outstanding supply of a share asset
    fn supply(&self, asset: &Pubkey) -> u64;

    /// Create a share asset that only `minter` may mint
    fn register_share_asset(&mut self, asset: Pubkey, minter: Pubkey) -> CoreResult<()>;

    /// Apply every movement or none of them
    fn execute(&mut self, movements: &[Movement]) -> CoreResult<()>;
}

/// Hash-map backed custody for simulation and tests
#[derive(Debug, Clone, Default)]
pub struct InMemoryCustody {
    balances: HashMap<CustodyAccount, u64>,
    supplies: HashMap<Pubkey, u64>,
    minters: HashMap<Pubkey, Pubkey>,
}

impl InMemoryCustody {
    pub fn new() -> Self {
        Self::default()
    }

    /// Faucet: credit `amount` of an external asset to `owner`
    pub fn credit(&mut self, owner: Pubkey, asset: Pubkey, amount: u64) -> CoreResult<()> {
        let account = CustodyAccount::new(owner, asset);
        let balance = self.balances.entry(account).or_insert(0);
        *balance = safe_add_u64(*balance, amount)?;
        Ok(())
    }

    fn apply(
        &self,
        balances: &mut HashMap<CustodyAccount, u64>,
        supplies: &mut HashMap<Pubkey, u64>,
        movement: &Movement,
    ) -> CoreResult<()> {
        match *movement {
            Movement::Transfer {
                from,
                to,
                amount,
                signer,
            } => {
                if from.asset != to.asset || signer != from.owner {
                    return Err(CpmmCoreError::CustodyRejected);
                }
                debit(balances, &from, amount)?;
                let target = balances.entry(to).or_insert(0);
                *target = safe_add_u64(*target, amount)?;
            }
            Movement::MintShares { to, amount, signer } => {
                if self.minters.get(&to.asset) != Some(&signer) {
                    return Err(CpmmCoreError::CustodyRejected);
                }
                let supply = supplies.entry(to.asset).or_insert(0);
                *supply = safe_add_u64(*supply, amount)?;
                let target = balances.entry(to).or_insert(0);
                *target = safe_add_u64(*target, amount)?;
            }
            Movement::BurnShares {
                from,
                amount,
                signer,
            } => {
                if signer != from.owner || !self.minters.contains_key(&from.asset) {
                    return Err(CpmmCoreError::CustodyRejected);
                }
                debit(balances, &from, amount)?;
                let supply = supplies.entry(from.asset).or_insert(0);
                *supply = safe_sub_u64(*supply, amount)?;
            }
        }
        Ok(())
    }
}

fn debit(
    balances: &mut HashMap<CustodyAccount, u64>,
    account: &CustodyAccount,
    amount: u64,
) -> CoreResult<()> {
    let balance = balances.entry(*account).or_insert(0);
    if *balance < amount {
        return Err(CpmmCoreError::InsufficientBalance);
    }
    *balance -= amount;
    Ok(())
}

impl Custody for InMemoryCustody {
    fn balance(&self, account: &CustodyAccount) -> u64 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    fn supply(&self, asset: &Pubkey) -> u64 {
        self.supplies.get(asset).copied().unwrap_or(0)
    }

    fn register_share_asset(&mut self, asset: Pubkey, minter: Pubkey) -> CoreResult<()> {
        if self.minters.contains_key(&asset) {
            return Err(CpmmCoreError::CustodyRejected);
        }
        self.minters.insert(asset, minter);
        self.supplies.insert(asset, 0);
        Ok(())
    }

    fn execute(&mut self, movements: &[Movement]) -> CoreResult<()> {
        let mut balances = self.balances.clone();
        let mut supplies = self.supplies.clone();
        for movement in movements {
            self.apply(&mut balances, &mut supplies, movement)?;
        }
        self.balances = balances;
        self.supplies = supplies;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_requires_owner_signature() {
        let mut custody = InMemoryCustody::new();
        let (alice, bob, asset) = (
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
        );
        custody.credit(alice, asset, 100).unwrap();

        let from = CustodyAccount::new(alice, asset);
        let to = CustodyAccount::new(bob, asset);
        let result = custody.execute(&[Movement::Transfer {
            from,
            to,
            amount: 10,
            signer: bob,
        }]);
        assert_eq!(result, Err(CpmmCoreError::CustodyRejected));

        custody
            .execute(&[Movement::Transfer {
                from,
                to,
                amount: 10,
                signer: alice,
            }])
            .unwrap();
        assert_eq!(custody.balance(&from), 90);
        assert_eq!(custody.balance(&to), 10);
    }

    #[test]
    fn test_failed_batch_applies_nothing() {
        let mut custody = InMemoryCustody::new();
        let (alice, pool, asset_x, asset_y) = (
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
        );
        custody.credit(alice, asset_x, 100).unwrap();
        custody.credit(alice, asset_y, 5).unwrap();

        let result = custody.execute(&[
            Movement::Transfer {
                from: CustodyAccount::new(alice, asset_x),
                to: CustodyAccount::new(pool, asset_x),
                amount: 100,
                signer: alice,
            },
            Movement::Transfer {
                from: CustodyAccount::new(alice, asset_y),
                to: CustodyAccount::new(pool, asset_y),
                amount: 6,
                signer: alice,
            },
        ]);
        assert_eq!(result, Err(CpmmCoreError::InsufficientBalance));
        assert_eq!(custody.balance(&CustodyAccount::new(alice, asset_x)), 100);
        assert_eq!(custody.balance(&CustodyAccount::new(pool, asset_x)), 0);
    }

    #[test]
    fn test_only_minter_can_mint() {
        let mut custody = InMemoryCustody::new();
        let (share, minter, holder) = (
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
        );
        custody.register_share_asset(share, minter).unwrap();

        let to = CustodyAccount::new(holder, share);
        assert_eq!(
            custody.execute(&[Movement::MintShares {
                to,
                amount: 5,
                signer: holder
            }]),
            Err(CpmmCoreError::CustodyRejected)
        );

        custody
            .execute(&[Movement::MintShares {
                to,
                amount: 5,
                signer: minter,
            }])
            .unwrap();
        assert_eq!(custody.supply(&share), 5);

        custody
            .execute(&[Movement::BurnShares {
                from: to,
                amount: 2,
                signer: holder,
            }])
            .unwrap();
        assert_eq!(custody.supply(&share), 3);
        assert_eq!(custody.balance(&to), 3);
    }
}
