//! Structured logging of mint lifecycle events

use crate::observability::TraceContext;
use solana_sdk::pubkey::Pubkey;

/// Structured logger for one mint run
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    context_id: String,
}

impl StructuredLogger {
    pub fn new(context_id: String) -> Self {
        Self { context_id }
    }

    pub fn from_trace(trace: &TraceContext) -> Self {
        Self::new(trace.correlation_id().to_string())
    }

    pub fn context_id(&self) -> &str {
        &self.context_id
    }

    pub fn log_mint_attempt(&self, candy_machine: &Pubkey, mint: &Pubkey, payer: &Pubkey) {
        tracing::info!(
            context_id = %self.context_id,
            candy_machine = %candy_machine,
            mint = %mint,
            payer = %payer,
            "Attempting candy machine mint"
        );
    }

    pub fn log_candy_machine_loaded(&self, candy_machine: &Pubkey, price: u64, items_remaining: u64) {
        tracing::debug!(
            context_id = %self.context_id,
            candy_machine = %candy_machine,
            price = %price,
            items_remaining = %items_remaining,
            "Candy machine loaded"
        );
    }

    /// Payment is delegated to a one-off transfer authority
    pub fn log_payment_flow(&self, payment_mint: &Pubkey, payment_account: &Pubkey, amount: u64) {
        tracing::info!(
            context_id = %self.context_id,
            payment_mint = %payment_mint,
            payment_account = %payment_account,
            amount = %amount,
            "Paying with SPL token"
        );
    }

    pub fn log_mint_submitted(&self, mint: &Pubkey, sig: &str, slot: u64, latency_ms: u64) {
        tracing::info!(
            context_id = %self.context_id,
            mint = %mint,
            signature = %sig,
            slot = %slot,
            latency_ms = %latency_ms,
            "Mint transaction confirmed"
        );
    }

    pub fn log_mint_failure(&self, mint: &Pubkey, category: &str, error: &str, latency_ms: u64) {
        tracing::warn!(
            context_id = %self.context_id,
            mint = %mint,
            category = %category,
            error = %error,
            latency_ms = %latency_ms,
            "Mint transaction failed"
        );
    }
}
