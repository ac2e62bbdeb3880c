//! Instruction builders and encoding checks that run without a validator

use anchor_lang::{prelude::*, system_program, Discriminator, InstructionData};
use anchor_spl::associated_token::{self, get_associated_token_address};
use anchor_spl::token;
use cpmm_core::PoolKey;

use crate::utils::{derive_amm, derive_pool_accounts};

type Instruction = anchor_lang::solana_program::instruction::Instruction;

pub struct InstructionBuilder;

impl InstructionBuilder {
    pub fn create_amm(
        payer: &Pubkey,
        admin: &Pubkey,
        id: Pubkey,
        fee_bps: u16,
    ) -> (Instruction, Pubkey) {
        let (amm, _) = derive_amm(&id);
        let accounts = crate::accounts::CreateAmm {
            amm,
            admin: *admin,
            payer: *payer,
            system_program: system_program::ID,
        };
        let instruction = Instruction {
            program_id: crate::ID,
            accounts: accounts.to_account_metas(None),
            data: crate::instruction::CreateAmm { id, fee_bps }.data(),
        };
        (instruction, amm)
    }

    pub fn create_pool(payer: &Pubkey, key: &PoolKey) -> (Instruction, Pubkey) {
        let addresses = derive_pool_accounts(key);
        let accounts = crate::accounts::CreatePool {
            amm: key.registry(),
            mint_a: key.asset_a(),
            mint_b: key.asset_b(),
            pool: addresses.pool,
            pool_authority: addresses.pool_authority,
            mint_liquidity: addresses.mint_liquidity,
            pool_account_a: get_associated_token_address(&addresses.pool_authority, &key.asset_a()),
            pool_account_b: get_associated_token_address(&addresses.pool_authority, &key.asset_b()),
            payer: *payer,
            token_program: token::ID,
            associated_token_program: associated_token::ID,
            system_program: system_program::ID,
        };
        let instruction = Instruction {
            program_id: crate::ID,
            accounts: accounts.to_account_metas(None),
            data: crate::instruction::CreatePool {}.data(),
        };
        (instruction, addresses.pool)
    }

    pub fn deposit_liquidity(
        depositor: &Pubkey,
        key: &PoolKey,
        amount_a: u64,
        amount_b: u64,
    ) -> Instruction {
        let addresses = derive_pool_accounts(key);
        let accounts = crate::accounts::DepositLiquidity {
            pool: addresses.pool,
            pool_authority: addresses.pool_authority,
            depositor: *depositor,
            mint_liquidity: addresses.mint_liquidity,
            mint_a: key.asset_a(),
            mint_b: key.asset_b(),
            pool_account_a: get_associated_token_address(&addresses.pool_authority, &key.asset_a()),
            pool_account_b: get_associated_token_address(&addresses.pool_authority, &key.asset_b()),
            depositor_account_liquidity: get_associated_token_address(
                depositor,
                &addresses.mint_liquidity,
            ),
            depositor_account_a: get_associated_token_address(depositor, &key.asset_a()),
            depositor_account_b: get_associated_token_address(depositor, &key.asset_b()),
            payer: *depositor,
            token_program: token::ID,
            associated_token_program: associated_token::ID,
            system_program: system_program::ID,
        };
        Instruction {
            program_id: crate::ID,
            accounts: accounts.to_account_metas(None),
            data: crate::instruction::DepositLiquidity { amount_a, amount_b }.data(),
        }
    }

    pub fn swap(
        trader: &Pubkey,
        key: &PoolKey,
        swap_a: bool,
        input_amount: u64,
        min_output_amount: u64,
    ) -> Instruction {
        let addresses = derive_pool_accounts(key);
        let accounts = crate::accounts::SwapExactTokensForTokens {
            amm: key.registry(),
            pool: addresses.pool,
            pool_authority: addresses.pool_authority,
            trader: *trader,
            mint_a: key.asset_a(),
            mint_b: key.asset_b(),
            pool_account_a: get_associated_token_address(&addresses.pool_authority, &key.asset_a()),
            pool_account_b: get_associated_token_address(&addresses.pool_authority, &key.asset_b()),
            trader_account_a: get_associated_token_address(trader, &key.asset_a()),
            trader_account_b: get_associated_token_address(trader, &key.asset_b()),
            payer: *trader,
            token_program: token::ID,
            associated_token_program: associated_token::ID,
            system_program: system_program::ID,
        };
        Instruction {
            program_id: crate::ID,
            accounts: accounts.to_account_metas(None),
            data: crate::instruction::SwapExactTokensForTokens {
                swap_a,
                input_amount,
                min_output_amount,
            }
            .data(),
        }
    }
}

fn pool_key() -> PoolKey {
    let id = Pubkey::new_unique();
    let (amm, _) = derive_amm(&id);
    PoolKey::new(amm, Pubkey::new_unique(), Pubkey::new_unique()).unwrap()
}

#[test]
fn test_create_amm_instruction() {
    let (payer, admin, id) = (Pubkey::new_unique(), Pubkey::new_unique(), Pubkey::new_unique());
    let (instruction, amm) = InstructionBuilder::create_amm(&payer, &admin, id, 30);

    assert_eq!(instruction.accounts[0].pubkey, amm);
    assert!(instruction.accounts[0].is_writable);
    assert!(!instruction.accounts[1].is_signer);
    assert!(instruction.accounts[2].is_signer);

    assert_eq!(&instruction.data[..8], crate::instruction::CreateAmm::DISCRIMINATOR);
    assert_eq!(&instruction.data[8..40], id.as_ref());
    assert_eq!(&instruction.data[40..], &30u16.to_le_bytes());
}

#[test]
fn test_create_pool_accounts_follow_canonical_key() {
    let key = pool_key();
    let payer = Pubkey::new_unique();
    let (instruction, pool) = InstructionBuilder::create_pool(&payer, &key);

    let metas = &instruction.accounts;
    assert_eq!(metas[0].pubkey, key.registry());
    assert_eq!(metas[1].pubkey, key.asset_a());
    assert_eq!(metas[2].pubkey, key.asset_b());
    assert_eq!(metas[3].pubkey, pool);
    assert!(metas[3].is_writable);
    assert_eq!(instruction.data, crate::instruction::CreatePool::DISCRIMINATOR);
}

#[test]
fn test_deposit_instruction_data() {
    let key = pool_key();
    let depositor = Pubkey::new_unique();
    let instruction = InstructionBuilder::deposit_liquidity(&depositor, &key, 1_000, 4_000);

    assert_eq!(instruction.data.len(), 8 + 16);
    assert_eq!(&instruction.data[8..16], &1_000u64.to_le_bytes());
    assert_eq!(&instruction.data[16..24], &4_000u64.to_le_bytes());

    let signers: Vec<_> = instruction
        .accounts
        .iter()
        .filter(|meta| meta.is_signer)
        .map(|meta| meta.pubkey)
        .collect();
    assert_eq!(signers, vec![depositor, depositor]);
}

#[test]
fn test_swap_instruction_data() {
    let key = pool_key();
    let trader = Pubkey::new_unique();
    let instruction = InstructionBuilder::swap(&trader, &key, true, 1_000_000, 960_000);

    assert_eq!(instruction.data[8], 1);
    assert_eq!(&instruction.data[9..17], &1_000_000u64.to_le_bytes());
    assert_eq!(&instruction.data[17..25], &960_000u64.to_le_bytes());
    // Registry is read-only during a swap
    assert!(!instruction.accounts[0].is_writable);
}
