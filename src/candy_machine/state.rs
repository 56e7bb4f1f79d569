//! Candy machine account state

use super::{anchor_discriminator, DISCRIMINATOR_LEN};
use crate::tx_builder::MintError;
use borsh::{BorshDeserialize, BorshSerialize};
use solana_sdk::pubkey::Pubkey;

/// Candy machine account, as stored after the Anchor discriminator
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct CandyMachine {
    pub authority: Pubkey,
    /// Receives the mint price
    pub wallet: Pubkey,
    /// SPL token the price is paid in; `None` means native SOL
    pub token_mint: Option<Pubkey>,
    pub config: Pubkey,
    pub data: CandyMachineData,
    pub items_redeemed: u64,
    pub bump: u8,
}

/// Candy machine settings
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct CandyMachineData {
    pub uuid: String,
    pub price: u64,
    pub items_available: u64,
    pub go_live_date: Option<i64>,
}

impl CandyMachine {
    pub fn discriminator() -> [u8; DISCRIMINATOR_LEN] {
        anchor_discriminator("account", "CandyMachine")
    }

    /// Decode raw account data fetched from `address`
    ///
    /// Trailing bytes after the encoded state are account padding and are
    /// ignored.
    pub fn try_from_account_data(address: &Pubkey, data: &[u8]) -> Result<Self, MintError> {
        if data.len() < DISCRIMINATOR_LEN {
            return Err(MintError::decode_failed(
                address,
                format!("account data too short ({} bytes)", data.len()),
            ));
        }

        let (discriminator, mut rest) = data.split_at(DISCRIMINATOR_LEN);
        if discriminator != Self::discriminator().as_slice() {
            return Err(MintError::decode_failed(
                address,
                "account is not a candy machine (discriminator mismatch)",
            ));
        }

        Self::deserialize(&mut rest).map_err(|e| MintError::decode_failed(address, e.to_string()))
    }

    /// Encode as account data, discriminator included
    pub fn to_account_data(&self) -> Result<Vec<u8>, MintError> {
        let mut data = Self::discriminator().to_vec();
        self.serialize(&mut data)
            .map_err(|e| MintError::decode_failed(self.config, e.to_string()))?;
        Ok(data)
    }

    /// Mint of the payment token, when the price is not paid in SOL
    pub fn payment_mint(&self) -> Option<Pubkey> {
        self.token_mint
    }

    pub fn price(&self) -> u64 {
        self.data.price
    }

    pub fn items_remaining(&self) -> u64 {
        self.data.items_available.saturating_sub(self.items_redeemed)
    }
}
