//! `mint_nft` instruction encoding

use super::{anchor_discriminator, DISCRIMINATOR_LEN};
use crate::accounts::{CANDY_MACHINE_PROGRAM_ID, TOKEN_METADATA_PROGRAM_ID};
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    system_program, sysvar,
};

/// Accounts for `mint_nft` that vary per mint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintNftAccounts {
    pub config: Pubkey,
    pub candy_machine: Pubkey,
    pub payer: Pubkey,
    /// Treasury wallet recorded on the candy machine
    pub wallet: Pubkey,
    pub metadata: Pubkey,
    pub mint: Pubkey,
    pub mint_authority: Pubkey,
    pub update_authority: Pubkey,
    pub master_edition: Pubkey,
}

/// Instruction data for `mint_nft`; the method takes no arguments
pub fn mint_nft_data() -> [u8; DISCRIMINATOR_LEN] {
    anchor_discriminator("global", "mint_nft")
}

/// Build the `mint_nft` instruction
///
/// `remaining_accounts` are appended after the fixed accounts; the program
/// reads the payment token account and its transfer authority from there.
pub fn mint_nft(accounts: &MintNftAccounts, remaining_accounts: Vec<AccountMeta>) -> Instruction {
    let mut metas = vec![
        AccountMeta::new_readonly(accounts.config, false),
        AccountMeta::new(accounts.candy_machine, false),
        AccountMeta::new(accounts.payer, true),
        AccountMeta::new(accounts.wallet, false),
        AccountMeta::new(accounts.metadata, false),
        AccountMeta::new(accounts.mint, false),
        AccountMeta::new_readonly(accounts.mint_authority, true),
        AccountMeta::new_readonly(accounts.update_authority, true),
        AccountMeta::new(accounts.master_edition, false),
        AccountMeta::new_readonly(TOKEN_METADATA_PROGRAM_ID, false),
        AccountMeta::new_readonly(spl_token::id(), false),
        AccountMeta::new_readonly(system_program::id(), false),
        AccountMeta::new_readonly(sysvar::rent::id(), false),
        AccountMeta::new_readonly(sysvar::clock::id(), false),
    ];
    metas.extend(remaining_accounts);

    Instruction::new_with_bytes(CANDY_MACHINE_PROGRAM_ID, &mint_nft_data(), metas)
}

/// Whether `ix` is a candy machine `mint_nft` call
pub fn is_mint_nft(ix: &Instruction) -> bool {
    ix.program_id == CANDY_MACHINE_PROGRAM_ID && ix.data.starts_with(&mint_nft_data())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accounts() -> MintNftAccounts {
        let payer = Pubkey::new_unique();
        MintNftAccounts {
            config: Pubkey::new_unique(),
            candy_machine: Pubkey::new_unique(),
            payer,
            wallet: Pubkey::new_unique(),
            metadata: Pubkey::new_unique(),
            mint: Pubkey::new_unique(),
            mint_authority: payer,
            update_authority: payer,
            master_edition: Pubkey::new_unique(),
        }
    }

    #[test]
    fn test_mint_nft_layout() {
        let accounts = accounts();
        let ix = mint_nft(&accounts, vec![]);

        assert_eq!(ix.program_id, CANDY_MACHINE_PROGRAM_ID);
        assert_eq!(ix.data, mint_nft_data().to_vec());
        assert_eq!(ix.accounts.len(), 14);

        assert_eq!(ix.accounts[0].pubkey, accounts.config);
        assert!(!ix.accounts[0].is_writable);
        assert!(ix.accounts[1].is_writable);
        assert!(ix.accounts[2].is_signer && ix.accounts[2].is_writable);
        assert_eq!(ix.accounts[3].pubkey, accounts.wallet);
        assert!(ix.accounts[6].is_signer && !ix.accounts[6].is_writable);
        assert!(ix.accounts[7].is_signer);
        assert_eq!(ix.accounts[8].pubkey, accounts.master_edition);
        assert_eq!(ix.accounts[9].pubkey, TOKEN_METADATA_PROGRAM_ID);
        assert_eq!(ix.accounts[13].pubkey, sysvar::clock::id());
        assert!(is_mint_nft(&ix));
    }

    #[test]
    fn test_mint_nft_remaining_accounts_appended() {
        let accounts = accounts();
        let token_account = Pubkey::new_unique();
        let ix = mint_nft(
            &accounts,
            vec![
                AccountMeta::new(token_account, false),
                AccountMeta::new_readonly(accounts.payer, true),
            ],
        );

        assert_eq!(ix.accounts.len(), 16);
        assert_eq!(ix.accounts[14].pubkey, token_account);
        assert!(ix.accounts[14].is_writable);
        assert!(ix.accounts[15].is_signer);
    }

    #[test]
    fn test_is_mint_nft_rejects_other_programs() {
        let ix = Instruction::new_with_bytes(Pubkey::new_unique(), &mint_nft_data(), vec![]);
        assert!(!is_mint_nft(&ix));
    }
}
