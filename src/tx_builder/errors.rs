//! Error types for the mint transaction pipeline
//!
//! Every stage of the mint flow (wallet loading, account fetch and decode,
//! instruction construction, signing, submission and confirmation) reports
//! through [`MintError`]. Nothing in the pipeline recovers from these errors
//! locally; they are propagated unchanged to the caller.

use crate::rpc_manager::RpcManagerError;
use thiserror::Error;

/// Error type for all mint operations
#[derive(Error, Debug)]
pub enum MintError {
    /// Invalid settings, unknown network environment or malformed input
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Keypair file missing, unreadable or malformed
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// On-chain account data did not match the expected layout
    #[error("Account decode error ({account}): {reason}")]
    AccountDecode {
        /// Address of the account that failed to decode
        account: String,
        /// Detailed reason for the failure
        reason: String,
    },

    /// Failed to build an instruction for a specific program
    #[error("Instruction build error (program={program}): {reason}")]
    InstructionBuild {
        /// The program the instruction targets
        program: String,
        /// Detailed reason for the failure
        reason: String,
    },

    /// The planned instruction list does not follow the mint layout
    #[error("Invalid instruction order: {0}")]
    InvalidInstructionOrder(String),

    /// Failed to sign the transaction
    #[error("Signing failed: {0}")]
    Signing(String),

    /// RPC communication failure
    #[error(transparent)]
    Rpc(#[from] RpcManagerError),

    /// The transaction landed but the program rejected it
    #[error("Transaction failed: {reason} (signature: {signature})")]
    TransactionFailed {
        /// Signature of the failed transaction
        signature: String,
        /// Last program log line, or the raw transaction error
        reason: String,
    },

    /// No confirmation was observed before the send timeout elapsed
    #[error("Timed out awaiting confirmation on transaction {signature} after {timeout_ms}ms")]
    ConfirmationTimeout {
        /// Signature of the unconfirmed transaction
        signature: String,
        /// The timeout that elapsed
        timeout_ms: u64,
    },
}

impl MintError {
    /// Check if this error is potentially retryable
    ///
    /// A timed-out transaction may still land, so retrying it risks a second
    /// mint; it is reported as non-retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Rpc(err) => err.is_retryable(),

            Self::Configuration(_) => false,
            Self::Wallet(_) => false,
            Self::AccountDecode { .. } => false,
            Self::InstructionBuild { .. } => false,
            Self::InvalidInstructionOrder(_) => false,
            Self::Signing(_) => false,
            Self::TransactionFailed { .. } => false,
            Self::ConfirmationTimeout { .. } => false,
        }
    }

    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "config",
            Self::Wallet(_) => "wallet",
            Self::AccountDecode { .. } => "decode",
            Self::InstructionBuild { .. } => "instruction",
            Self::InvalidInstructionOrder(_) => "validation",
            Self::Signing(_) => "signing",
            Self::Rpc(_) => "rpc",
            Self::TransactionFailed { .. } => "transaction",
            Self::ConfirmationTimeout { .. } => "timeout",
        }
    }
}

// Convenience constructors
impl MintError {
    /// Create an instruction build error for a specific program
    pub fn instruction_failed(program: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InstructionBuild {
            program: program.into(),
            reason: reason.into(),
        }
    }

    /// Create an account decode error
    pub fn decode_failed(account: impl ToString, reason: impl Into<String>) -> Self {
        Self::AccountDecode {
            account: account.to_string(),
            reason: reason.into(),
        }
    }

    /// Create an invalid instruction order error
    pub fn invalid_order(reason: impl Into<String>) -> Self {
        Self::InvalidInstructionOrder(reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MintError::Configuration("unknown env".to_string());
        assert_eq!(err.to_string(), "Configuration error: unknown env");

        let err = MintError::InstructionBuild {
            program: "spl_token".to_string(),
            reason: "invalid mint".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Instruction build error (program=spl_token): invalid mint"
        );

        let err = MintError::ConfirmationTimeout {
            signature: "abc".to_string(),
            timeout_ms: 15_000,
        };
        assert_eq!(
            err.to_string(),
            "Timed out awaiting confirmation on transaction abc after 15000ms"
        );
    }

    #[test]
    fn test_error_retryability() {
        let transport = MintError::Rpc(RpcManagerError::Transport {
            endpoint: "http://localhost:8899".to_string(),
            message: "connection refused".to_string(),
        });
        assert!(transport.is_retryable());

        assert!(!MintError::Wallet("missing".to_string()).is_retryable());
        assert!(!MintError::ConfirmationTimeout {
            signature: "sig".to_string(),
            timeout_ms: 1,
        }
        .is_retryable());
        assert!(!MintError::TransactionFailed {
            signature: "sig".to_string(),
            reason: "sold out".to_string(),
        }
        .is_retryable());
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(MintError::Wallet("x".to_string()).category(), "wallet");
        assert_eq!(MintError::decode_failed("acct", "short").category(), "decode");
        assert_eq!(MintError::invalid_order("x").category(), "validation");
    }
}
