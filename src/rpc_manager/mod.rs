//! RPC Manager Module
//!
//! The RPC seam used by the mint flow plus the retrying transaction sender.

use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_rpc_client_api::config::RpcSendTransactionConfig;
use solana_sdk::{hash::Hash, pubkey::Pubkey, signature::Signature, transaction::Transaction};
use solana_transaction_status::TransactionStatus;

// Submodules
pub mod rpc_errors;
pub mod sender;

// Re-exports for convenience
pub use rpc_errors::{RetryPolicy, RpcManagerError};
pub use sender::{send_signed_transaction, send_transaction_with_retry, SendOptions, SendOutcome};

pub type RpcResult<T> = Result<T, RpcManagerError>;

/// Result of a transaction simulation, reduced to what failure reporting needs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulationOutcome {
    /// Transaction error reported by the simulation, if any
    pub err: Option<String>,
    /// Program logs emitted during the simulation
    pub logs: Vec<String>,
}

/// RPC calls needed to mint from a candy machine
#[async_trait]
pub trait MintRpc: Send + Sync {
    /// Endpoint label used in errors and logs
    fn endpoint(&self) -> String;

    /// Lamports required for an account of `data_len` bytes to be rent exempt
    async fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> RpcResult<u64>;

    /// Raw data of an existing account
    async fn account_data(&self, address: &Pubkey) -> RpcResult<Vec<u8>>;

    async fn latest_blockhash(&self) -> RpcResult<Hash>;

    /// Submit a signed transaction with preflight checks skipped
    async fn send_transaction(&self, transaction: &Transaction) -> RpcResult<Signature>;

    async fn signature_status(&self, signature: &Signature) -> RpcResult<Option<TransactionStatus>>;

    async fn simulate_transaction(&self, transaction: &Transaction) -> RpcResult<SimulationOutcome>;
}

#[async_trait]
impl MintRpc for RpcClient {
    fn endpoint(&self) -> String {
        self.url()
    }

    async fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> RpcResult<u64> {
        self.get_minimum_balance_for_rent_exemption(data_len)
            .await
            .map_err(|e| RpcManagerError::from_client_error(e, &self.url()))
    }

    async fn account_data(&self, address: &Pubkey) -> RpcResult<Vec<u8>> {
        let account = self
            .get_account_with_commitment(address, self.commitment())
            .await
            .map_err(|e| RpcManagerError::from_client_error(e, &self.url()))?
            .value
            .ok_or_else(|| RpcManagerError::AccountNotFound {
                account: address.to_string(),
                endpoint: self.url(),
            })?;
        Ok(account.data)
    }

    async fn latest_blockhash(&self) -> RpcResult<Hash> {
        self.get_latest_blockhash()
            .await
            .map_err(|e| RpcManagerError::from_client_error(e, &self.url()))
    }

    async fn send_transaction(&self, transaction: &Transaction) -> RpcResult<Signature> {
        let config = RpcSendTransactionConfig {
            skip_preflight: true,
            ..RpcSendTransactionConfig::default()
        };
        self.send_transaction_with_config(transaction, config)
            .await
            .map_err(|e| RpcManagerError::from_client_error(e, &self.url()))
    }

    async fn signature_status(&self, signature: &Signature) -> RpcResult<Option<TransactionStatus>> {
        let response = self
            .get_signature_statuses(&[*signature])
            .await
            .map_err(|e| RpcManagerError::from_client_error(e, &self.url()))?;
        Ok(response.value.into_iter().next().flatten())
    }

    async fn simulate_transaction(&self, transaction: &Transaction) -> RpcResult<SimulationOutcome> {
        let response = RpcClient::simulate_transaction(self, transaction)
            .await
            .map_err(|e| RpcManagerError::from_client_error(e, &self.url()))?;
        Ok(SimulationOutcome {
            err: response.value.err.map(|e| format!("{:?}", e)),
            logs: response.value.logs.unwrap_or_default(),
        })
    }
}
