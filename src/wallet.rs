//! Wallet key loading

use crate::tx_builder::MintError;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signer},
};
use std::path::{Path, PathBuf};
use zeroize::Zeroizing;

const KEYPAIR_LEN: usize = 64;

/// The payer's keypair, loaded from disk
pub struct WalletManager {
    keypair: Keypair,
}

impl WalletManager {
    /// Load a keypair file: the Solana CLI JSON array or 64 raw bytes
    pub fn from_file(path: &str) -> Result<Self, MintError> {
        let path = expand_home(path);
        let file_bytes = Zeroizing::new(std::fs::read(&path).map_err(|e| {
            MintError::Wallet(format!("failed to read keypair file {}: {}", path.display(), e))
        })?);

        let key_bytes = if file_bytes.len() == KEYPAIR_LEN {
            // Raw bytes format
            Zeroizing::new(file_bytes.to_vec())
        } else {
            let json: Vec<u8> = serde_json::from_slice(&file_bytes).map_err(|e| {
                MintError::Wallet(format!("failed to parse keypair JSON {}: {}", path.display(), e))
            })?;
            Zeroizing::new(json)
        };

        Ok(Self {
            keypair: keypair_from_bytes(&key_bytes)?,
        })
    }

    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    pub fn into_keypair(self) -> Keypair {
        self.keypair
    }
}

/// Load the payer keypair named by a wallet key identifier
pub fn load_wallet_key(path: &str) -> Result<Keypair, MintError> {
    WalletManager::from_file(path).map(WalletManager::into_keypair)
}

fn keypair_from_bytes(bytes: &[u8]) -> Result<Keypair, MintError> {
    if bytes.len() != KEYPAIR_LEN {
        return Err(MintError::Wallet(format!(
            "invalid keypair length: expected {} bytes, got {}",
            KEYPAIR_LEN,
            bytes.len()
        )));
    }
    if bytes.iter().all(|&b| b == 0) {
        return Err(MintError::Wallet("invalid keypair: all-zero key rejected".to_string()));
    }
    Keypair::try_from(bytes).map_err(|e| MintError::Wallet(format!("invalid keypair bytes: {}", e)))
}

/// Expand a leading `~` to the home directory
fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return Path::new(&home).join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_json_keypair() {
        let keypair = Keypair::new();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = serde_json::to_string(&keypair.to_bytes().to_vec()).unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let loaded = load_wallet_key(file.path().to_str().unwrap()).unwrap();
        assert_eq!(loaded.pubkey(), keypair.pubkey());
    }

    #[test]
    fn test_load_raw_keypair() {
        let keypair = Keypair::new();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&keypair.to_bytes()).unwrap();

        let wallet = WalletManager::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(wallet.pubkey(), keypair.pubkey());
    }

    #[test]
    fn test_reject_all_zero_key() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0u8; 64]).unwrap();

        match load_wallet_key(file.path().to_str().unwrap()) {
            Err(MintError::Wallet(msg)) => assert!(msg.contains("all-zero")),
            other => panic!("expected wallet error, got {:?}", other.map(|k| k.pubkey())),
        }
    }

    #[test]
    fn test_reject_short_json_key() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[1, 2, 3]").unwrap();

        assert!(matches!(
            load_wallet_key(file.path().to_str().unwrap()),
            Err(MintError::Wallet(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            load_wallet_key("/nonexistent/id.json"),
            Err(MintError::Wallet(_))
        ));
    }

    #[test]
    fn test_expand_home() {
        if let Some(home) = std::env::var_os("HOME") {
            assert_eq!(
                expand_home("~/.config/solana/id.json"),
                Path::new(&home).join(".config/solana/id.json")
            );
        }
        assert_eq!(expand_home("/tmp/id.json"), PathBuf::from("/tmp/id.json"));
    }
}
