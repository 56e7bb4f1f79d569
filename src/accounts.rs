//! Address derivation for the accounts a mint touches
//!
//! Every address here is deterministic: program-derived addresses of the
//! candy machine and token metadata programs, and the associated token
//! account of a wallet for a mint.

use solana_sdk::{pubkey, pubkey::Pubkey};
use spl_associated_token_account::get_associated_token_address;

/// Candy machine program (v1)
pub const CANDY_MACHINE_PROGRAM_ID: Pubkey = pubkey!("cndyAnrLdpjq1Ssp1z8xxDsB8dxe7u4HL5Nxi2K5WXZ");

/// Token metadata program
pub const TOKEN_METADATA_PROGRAM_ID: Pubkey = pubkey!("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s");

/// Seed prefix of the candy machine PDA
pub const CANDY_MACHINE_SEED: &[u8] = b"candy_machine";

/// Seed prefix of token metadata PDAs
pub const METADATA_SEED: &[u8] = b"metadata";

/// Seed suffix of the master edition PDA
pub const EDITION_SEED: &[u8] = b"edition";

/// Length of the uuid a candy machine is keyed by
pub const UUID_LEN: usize = 6;

/// The candy machine uuid: the first six characters of the config address
pub fn uuid_from_config_pubkey(config: &Pubkey) -> String {
    config.to_string().chars().take(UUID_LEN).collect()
}

/// Candy machine PDA for a config account and uuid
pub fn candy_machine_address(config: &Pubkey, uuid: &str) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[CANDY_MACHINE_SEED, config.as_ref(), uuid.as_bytes()],
        &CANDY_MACHINE_PROGRAM_ID,
    )
}

/// Metadata PDA of a mint
pub fn metadata_address(mint: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[
            METADATA_SEED,
            TOKEN_METADATA_PROGRAM_ID.as_ref(),
            mint.as_ref(),
        ],
        &TOKEN_METADATA_PROGRAM_ID,
    )
    .0
}

/// Master edition PDA of a mint
pub fn master_edition_address(mint: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[
            METADATA_SEED,
            TOKEN_METADATA_PROGRAM_ID.as_ref(),
            mint.as_ref(),
            EDITION_SEED,
        ],
        &TOKEN_METADATA_PROGRAM_ID,
    )
    .0
}

/// Associated token account of `wallet` for `mint`
pub fn token_wallet(wallet: &Pubkey, mint: &Pubkey) -> Pubkey {
    get_associated_token_address(wallet, mint)
}
