//! Mint transaction building
//!
//! The transaction builder is split into focused modules:
//! - **errors**: error taxonomy shared by the whole mint flow
//! - **instructions**: pure instruction planning and order validation
//! - **output**: the signed transaction and its signers
//!
//! ## Instruction order
//!
//! Every mint transaction carries, in order: create mint account, initialize
//! mint, create associated token account, mint one token, then the candy
//! machine `mint_nft` call. When the candy machine charges in an SPL token,
//! `approve` precedes `mint_nft` and `revoke` follows it, so the delegation
//! never outlives the transaction.
//!
//! ```rust,no_run
//! use candy_mint::tx_builder::{plan_mint_instructions, MintPlanInput};
//! # fn example(input: MintPlanInput<'_>) -> Result<(), candy_mint::tx_builder::MintError> {
//! let plan = plan_mint_instructions(&input)?;
//! assert_eq!(plan.instructions.len(), if plan.uses_payment_token() { 7 } else { 5 });
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod instructions;
pub mod output;

pub use errors::MintError;
pub use instructions::{
    plan_mint_instructions, sanity_check_ix_order, InstructionPlan, MintPlanInput,
    MINT_ACCOUNT_LEN,
};
pub use output::TxBuildOutput;
