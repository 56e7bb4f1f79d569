//! Test Utilities Module
//!
//! A scripted in-memory [`MintRpc`] for driving the mint flow and the sender
//! without a network.
//!
//! These utilities are only compiled when running tests or when the
//! `test_utils` feature is enabled.

#![cfg(any(test, feature = "test_utils"))]

use crate::candy_machine::{CandyMachine, CandyMachineData};
use crate::rpc_manager::{MintRpc, RpcManagerError, RpcResult, SimulationOutcome};
use async_trait::async_trait;
use solana_sdk::{
    hash::Hash,
    instruction::InstructionError,
    pubkey::Pubkey,
    signature::Signature,
    transaction::{Transaction, TransactionError},
};
use solana_transaction_status::{TransactionConfirmationStatus, TransactionStatus};
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use tokio::sync::Mutex;

pub const MOCK_ENDPOINT: &str = "mock://rpc";

/// Rent the mock reports for every account size
pub const MOCK_RENT_LAMPORTS: u64 = 1_461_600;

/// Scripted RPC
///
/// Signature statuses are served from a queue, one per poll; an empty queue
/// reads as "signature not found yet".
pub struct MockRpc {
    pub accounts: Mutex<HashMap<Pubkey, Vec<u8>>>,
    pub blockhash: Hash,
    pub rent_lamports: u64,
    /// Every transaction passed to `send_transaction`, resends included
    pub sent: Mutex<Vec<Transaction>>,
    /// Errors returned by the next sends, before sends start succeeding
    pub send_failures: Mutex<VecDeque<RpcManagerError>>,
    pub statuses: Mutex<VecDeque<Option<TransactionStatus>>>,
    pub simulation: Mutex<SimulationOutcome>,
    pub status_polls: Mutex<usize>,
    /// Latency of every send after the first one
    pub rebroadcast_delay: Option<Duration>,
}

impl MockRpc {
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            blockhash: Hash::new_unique(),
            rent_lamports: MOCK_RENT_LAMPORTS,
            sent: Mutex::new(Vec::new()),
            send_failures: Mutex::new(VecDeque::new()),
            statuses: Mutex::new(VecDeque::new()),
            simulation: Mutex::new(SimulationOutcome::default()),
            status_polls: Mutex::new(0),
            rebroadcast_delay: None,
        }
    }

    /// Rebroadcasts take `delay` to answer, like an overloaded endpoint
    pub fn with_rebroadcast_delay(mut self, delay: Duration) -> Self {
        self.rebroadcast_delay = Some(delay);
        self
    }

    pub async fn insert_account(&self, address: Pubkey, data: Vec<u8>) {
        self.accounts.lock().await.insert(address, data);
    }

    pub async fn push_status(&self, status: Option<TransactionStatus>) {
        self.statuses.lock().await.push_back(status);
    }

    pub async fn push_send_failure(&self, err: RpcManagerError) {
        self.send_failures.lock().await.push_back(err);
    }

    pub async fn set_simulation(&self, simulation: SimulationOutcome) {
        *self.simulation.lock().await = simulation;
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    pub async fn last_sent(&self) -> Option<Transaction> {
        self.sent.lock().await.last().cloned()
    }

    pub async fn status_poll_count(&self) -> usize {
        *self.status_polls.lock().await
    }
}

impl Default for MockRpc {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MintRpc for MockRpc {
    fn endpoint(&self) -> String {
        MOCK_ENDPOINT.to_string()
    }

    async fn minimum_balance_for_rent_exemption(&self, _data_len: usize) -> RpcResult<u64> {
        Ok(self.rent_lamports)
    }

    async fn account_data(&self, address: &Pubkey) -> RpcResult<Vec<u8>> {
        self.accounts
            .lock()
            .await
            .get(address)
            .cloned()
            .ok_or_else(|| RpcManagerError::AccountNotFound {
                account: address.to_string(),
                endpoint: MOCK_ENDPOINT.to_string(),
            })
    }

    async fn latest_blockhash(&self) -> RpcResult<Hash> {
        Ok(self.blockhash)
    }

    async fn send_transaction(&self, transaction: &Transaction) -> RpcResult<Signature> {
        let previous_sends = {
            let mut sent = self.sent.lock().await;
            sent.push(transaction.clone());
            sent.len() - 1
        };
        if let (Some(delay), true) = (self.rebroadcast_delay, previous_sends > 0) {
            tokio::time::sleep(delay).await;
        }
        if let Some(err) = self.send_failures.lock().await.pop_front() {
            return Err(err);
        }
        Ok(transaction.signatures.first().copied().unwrap_or_default())
    }

    async fn signature_status(&self, _signature: &Signature) -> RpcResult<Option<TransactionStatus>> {
        *self.status_polls.lock().await += 1;
        Ok(self.statuses.lock().await.pop_front().flatten())
    }

    async fn simulate_transaction(&self, _transaction: &Transaction) -> RpcResult<SimulationOutcome> {
        Ok(self.simulation.lock().await.clone())
    }
}

/// A status that satisfies `confirmed`
pub fn confirmed_status(slot: u64) -> TransactionStatus {
    TransactionStatus {
        slot,
        confirmations: Some(1),
        status: Ok(()),
        err: None,
        confirmation_status: Some(TransactionConfirmationStatus::Confirmed),
    }
}

/// A status seen before it reaches `confirmed`
pub fn processed_status(slot: u64) -> TransactionStatus {
    TransactionStatus {
        slot,
        confirmations: Some(0),
        status: Ok(()),
        err: None,
        confirmation_status: Some(TransactionConfirmationStatus::Processed),
    }
}

/// A landed transaction the program rejected with a custom error
pub fn failed_status(slot: u64, custom_code: u32) -> TransactionStatus {
    let err = TransactionError::InstructionError(5, InstructionError::Custom(custom_code));
    TransactionStatus {
        slot,
        confirmations: Some(1),
        status: Err(err.clone()),
        err: Some(err),
        confirmation_status: Some(TransactionConfirmationStatus::Confirmed),
    }
}

/// A candy machine for tests; `token_mint` selects the payment flow
pub fn sample_candy_machine(config: Pubkey, token_mint: Option<Pubkey>) -> CandyMachine {
    CandyMachine {
        authority: Pubkey::new_unique(),
        wallet: Pubkey::new_unique(),
        token_mint,
        config,
        data: CandyMachineData {
            uuid: crate::accounts::uuid_from_config_pubkey(&config),
            price: 1_000_000,
            items_available: 20,
            go_live_date: None,
        },
        items_redeemed: 2,
        bump: 255,
    }
}
