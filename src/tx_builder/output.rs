//! Signed transaction output
//!
//! [`TxBuildOutput`] holds the fully signed mint transaction together with
//! the signers its message requires, ready for the sender.

use crate::tx_builder::errors::MintError;
use solana_sdk::{
    hash::Hash,
    instruction::Instruction,
    message::Message,
    pubkey::Pubkey,
    signature::{Signature, Signer},
    transaction::Transaction,
};

/// Signed transaction ready for broadcast
#[derive(Debug, Clone)]
pub struct TxBuildOutput {
    /// The signed transaction
    pub tx: Transaction,

    /// Accounts that had to sign, in message order
    /// Extracted from message.header.num_required_signatures
    pub required_signers: Vec<Pubkey>,
}

impl TxBuildOutput {
    /// Compile `instructions` with `payer` as fee payer and sign them
    ///
    /// `signers` must cover every signer the message requires; a signer
    /// that appears more than once is only used once.
    pub fn sign(
        payer: &dyn Signer,
        instructions: &[Instruction],
        signers: &[&dyn Signer],
        blockhash: Hash,
    ) -> Result<Self, MintError> {
        let payer_pubkey = payer.pubkey();
        let message = Message::new_with_blockhash(instructions, Some(&payer_pubkey), &blockhash);

        let mut unique: Vec<&dyn Signer> = Vec::with_capacity(signers.len() + 1);
        unique.push(payer);
        for signer in signers {
            if !unique.iter().any(|s| s.pubkey() == signer.pubkey()) {
                unique.push(*signer);
            }
        }

        let mut tx = Transaction::new_unsigned(message);
        tx.try_sign(unique.as_slice(), blockhash)
            .map_err(|e| MintError::Signing(e.to_string()))?;

        Ok(Self::new(tx))
    }

    /// Wrap an already signed transaction
    pub fn new(tx: Transaction) -> Self {
        let num_signers = tx.message.header.num_required_signatures as usize;
        let required_signers = tx
            .message
            .account_keys
            .iter()
            .take(num_signers)
            .copied()
            .collect();

        Self {
            tx,
            required_signers,
        }
    }

    /// The transaction id: the fee payer's signature
    pub fn signature(&self) -> Signature {
        self.tx.signatures.first().copied().unwrap_or_default()
    }

    pub fn required_signers(&self) -> &[Pubkey] {
        &self.required_signers
    }
}
