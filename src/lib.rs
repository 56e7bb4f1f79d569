//! candy-mint: mint a single NFT from a candy machine
//!
//! One atomic transaction creates the mint, mints one token into the payer's
//! associated token account and calls the candy machine's `mint_nft`.

pub mod accounts;
pub mod candy_machine;
pub mod cluster;
pub mod config;
pub mod mint;
pub mod observability;
pub mod rpc_manager;
pub mod structured_logging;
pub mod tx_builder;
pub mod wallet;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

pub use cluster::Cluster;
pub use config::Settings;
pub use mint::{mint, mint_one, mint_with_settings};
pub use rpc_manager::{MintRpc, SendOptions, SendOutcome};
pub use tx_builder::MintError;

// Re-export commonly used types
pub use solana_sdk::{pubkey::Pubkey, signature::Signature};

#[cfg(test)]
mod tests {
    mod mint_flow_tests;
    mod sender_tests;
}
