//! Client for the candy machine program
//!
//! Account decoding and instruction encoding for the Anchor-based candy
//! machine. Anchor prefixes account data and instruction data with an 8-byte
//! discriminator derived from the type or method name.

pub mod instruction;
pub mod state;

pub use instruction::{mint_nft, MintNftAccounts};
pub use state::{CandyMachine, CandyMachineData};

use sha2::{Digest, Sha256};

/// Length of an Anchor discriminator
pub const DISCRIMINATOR_LEN: usize = 8;

/// Anchor discriminator: first 8 bytes of `sha256("<namespace>:<name>")`
pub fn anchor_discriminator(namespace: &str, name: &str) -> [u8; DISCRIMINATOR_LEN] {
    let digest = Sha256::digest(format!("{}:{}", namespace, name).as_bytes());
    let mut discriminator = [0u8; DISCRIMINATOR_LEN];
    discriminator.copy_from_slice(&digest[..DISCRIMINATOR_LEN]);
    discriminator
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discriminators_differ_by_namespace() {
        let account = anchor_discriminator("account", "CandyMachine");
        let global = anchor_discriminator("global", "CandyMachine");
        assert_ne!(account, global);
        assert_eq!(account, anchor_discriminator("account", "CandyMachine"));
    }
}
