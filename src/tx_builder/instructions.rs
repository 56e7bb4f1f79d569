//! Instruction planning and ordering validation
//!
//! A mint transaction always carries its instructions in this order:
//! 1. system `create_account` for the new mint
//! 2. token `initialize_mint`
//! 3. associated token account `create`
//! 4. token `mint_to` (amount 1)
//! 5. token `approve` of the payment token (only with a payment token)
//! 6. candy machine `mint_nft`
//! 7. token `revoke` of the payment token (only with a payment token)
//!
//! Planning is pure: every value fetched from the chain is an input, so the
//! plan can be checked without a network.

use crate::accounts::{master_edition_address, metadata_address, token_wallet};
use crate::candy_machine::{self, CandyMachine, MintNftAccounts};
use crate::tx_builder::errors::MintError;
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    system_instruction,
};
use spl_token::solana_program::program_pack::Pack;

/// Decimals of the minted token
pub const NFT_DECIMALS: u8 = 0;

/// Amount minted into the payer's token account
pub const NFT_AMOUNT: u64 = 1;

/// Space of an SPL mint account
pub const MINT_ACCOUNT_LEN: usize = spl_token::state::Mint::LEN;

// SPL token instruction tags
#[cfg_attr(not(debug_assertions), allow(dead_code))]
const TAG_INITIALIZE_MINT: u8 = 0;
#[cfg_attr(not(debug_assertions), allow(dead_code))]
const TAG_APPROVE: u8 = 4;
#[cfg_attr(not(debug_assertions), allow(dead_code))]
const TAG_REVOKE: u8 = 5;
#[cfg_attr(not(debug_assertions), allow(dead_code))]
const TAG_MINT_TO: u8 = 7;

/// Everything the planner needs, gathered by the caller
#[derive(Debug, Clone)]
pub struct MintPlanInput<'a> {
    /// Fee payer, mint/freeze authority and token account owner
    pub payer: Pubkey,
    /// Freshly generated mint account
    pub mint: Pubkey,
    pub config_address: Pubkey,
    pub candy_machine_address: Pubkey,
    pub candy_machine: &'a CandyMachine,
    /// Rent-exempt minimum for [`MINT_ACCOUNT_LEN`] bytes
    pub mint_rent_lamports: u64,
    /// Delegate for the payment token; required when the candy machine
    /// charges in an SPL token
    pub transfer_authority: Option<Pubkey>,
}

/// Ordered instructions for one mint
#[derive(Debug, Clone)]
pub struct InstructionPlan {
    /// The ordered list of instructions for the transaction
    pub instructions: Vec<Instruction>,

    /// Payer's associated token account for the new mint
    pub user_token_account: Pubkey,

    pub metadata: Pubkey,

    pub master_edition: Pubkey,

    /// Payer's payment token account, when the price is paid in a token
    pub payment_token_account: Option<Pubkey>,
}

impl InstructionPlan {
    pub fn uses_payment_token(&self) -> bool {
        self.payment_token_account.is_some()
    }
}

fn token_ix(
    name: &str,
    result: Result<Instruction, spl_token::solana_program::program_error::ProgramError>,
) -> Result<Instruction, MintError> {
    result.map_err(|e| MintError::instruction_failed("spl_token", format!("{}: {}", name, e)))
}

/// Plan the mint instructions in their fixed order
pub fn plan_mint_instructions(input: &MintPlanInput<'_>) -> Result<InstructionPlan, MintError> {
    let token_program = spl_token::id();
    let payer = input.payer;
    let mint = input.mint;

    let user_token_account = token_wallet(&payer, &mint);

    // Maximum: 4 setup + approve + mint_nft + revoke
    let mut instructions = Vec::with_capacity(7);

    instructions.push(system_instruction::create_account(
        &payer,
        &mint,
        input.mint_rent_lamports,
        MINT_ACCOUNT_LEN as u64,
        &token_program,
    ));
    instructions.push(token_ix(
        "initialize_mint",
        spl_token::instruction::initialize_mint(
            &token_program,
            &mint,
            &payer,
            Some(&payer),
            NFT_DECIMALS,
        ),
    )?);
    instructions.push(
        spl_associated_token_account::instruction::create_associated_token_account(
            &payer,
            &payer,
            &mint,
            &token_program,
        ),
    );
    instructions.push(token_ix(
        "mint_to",
        spl_token::instruction::mint_to(
            &token_program,
            &mint,
            &user_token_account,
            &payer,
            &[],
            NFT_AMOUNT,
        ),
    )?);

    let mut remaining_accounts = Vec::new();
    let payment_token_account = match input.candy_machine.payment_mint() {
        Some(payment_mint) => {
            let transfer_authority = input.transfer_authority.ok_or_else(|| {
                MintError::Configuration(
                    "candy machine charges in an SPL token but no transfer authority was provided"
                        .to_string(),
                )
            })?;
            let token_account = token_wallet(&payer, &payment_mint);

            remaining_accounts.push(AccountMeta::new(token_account, false));
            remaining_accounts.push(AccountMeta::new_readonly(payer, true));

            instructions.push(token_ix(
                "approve",
                spl_token::instruction::approve(
                    &token_program,
                    &token_account,
                    &transfer_authority,
                    &payer,
                    &[],
                    input.candy_machine.price(),
                ),
            )?);
            Some(token_account)
        }
        None => None,
    };

    let metadata = metadata_address(&mint);
    let master_edition = master_edition_address(&mint);

    instructions.push(candy_machine::mint_nft(
        &MintNftAccounts {
            config: input.config_address,
            candy_machine: input.candy_machine_address,
            payer,
            wallet: input.candy_machine.wallet,
            metadata,
            mint,
            mint_authority: payer,
            update_authority: payer,
            master_edition,
        },
        remaining_accounts,
    ));

    if let Some(token_account) = payment_token_account {
        instructions.push(token_ix(
            "revoke",
            spl_token::instruction::revoke(&token_program, &token_account, &payer, &[]),
        )?);
    }

    sanity_check_ix_order(&instructions, payment_token_account.is_some())?;

    Ok(InstructionPlan {
        instructions,
        user_token_account,
        metadata,
        master_edition,
        payment_token_account,
    })
}

#[cfg_attr(not(debug_assertions), allow(dead_code))]
fn is_token_ix(ix: &Instruction, tag: u8) -> bool {
    ix.program_id == spl_token::id() && ix.data.first() == Some(&tag)
}

/// Validate the fixed mint instruction order (debug/test only)
///
/// `approve` and `revoke` must be present together, and only when
/// `with_payment` is set.
#[cfg(debug_assertions)]
pub fn sanity_check_ix_order(
    instructions: &[Instruction],
    with_payment: bool,
) -> Result<(), MintError> {
    use solana_sdk::system_program;

    type Check = (&'static str, fn(&Instruction) -> bool);

    let create: Check = ("create_account", |ix| ix.program_id == system_program::id());
    let init: Check = ("initialize_mint", |ix| is_token_ix(ix, TAG_INITIALIZE_MINT));
    let ata: Check = ("create_associated_token_account", |ix| {
        ix.program_id == spl_associated_token_account::id()
    });
    let mint_to: Check = ("mint_to", |ix| is_token_ix(ix, TAG_MINT_TO));
    let approve: Check = ("approve", |ix| is_token_ix(ix, TAG_APPROVE));
    let mint_nft: Check = ("mint_nft", candy_machine::instruction::is_mint_nft);
    let revoke: Check = ("revoke", |ix| is_token_ix(ix, TAG_REVOKE));

    let expected: Vec<Check> = if with_payment {
        vec![create, init, ata, mint_to, approve, mint_nft, revoke]
    } else {
        vec![create, init, ata, mint_to, mint_nft]
    };

    if instructions.len() != expected.len() {
        return Err(MintError::invalid_order(format!(
            "expected {} instructions, got {}",
            expected.len(),
            instructions.len()
        )));
    }

    for (idx, (ix, (name, check))) in instructions.iter().zip(expected.iter()).enumerate() {
        if !check(ix) {
            return Err(MintError::invalid_order(format!(
                "expected {} at position {}, got program_id: {}",
                name, idx, ix.program_id
            )));
        }
    }

    Ok(())
}

/// No-op version of sanity_check_ix_order for release builds
#[cfg(not(debug_assertions))]
#[inline]
pub fn sanity_check_ix_order(
    _instructions: &[Instruction],
    _with_payment: bool,
) -> Result<(), MintError> {
    Ok(())
}
