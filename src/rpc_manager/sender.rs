//! Retrying transaction sender
//!
//! Signs a transaction against a fresh blockhash, submits it with preflight
//! skipped and then keeps rebroadcasting the same signed bytes until the
//! signature reaches the requested commitment, fails, or the timeout
//! elapses. Rebroadcasting is safe: the signature dedupes on chain.

use super::{MintRpc, RetryPolicy, SimulationOutcome};
use crate::tx_builder::{MintError, TxBuildOutput};
use solana_sdk::{
    commitment_config::CommitmentConfig,
    instruction::Instruction,
    signature::{Signature, Signer},
    transaction::Transaction,
};
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

const PROGRAM_LOG_PREFIX: &str = "Program log: ";

/// Tuning for [`send_transaction_with_retry`]
#[derive(Debug, Clone)]
pub struct SendOptions {
    /// Total time allowed from the first accepted send to confirmation
    pub timeout: Duration,
    /// Interval between rebroadcasts of the signed transaction
    pub resend_interval: Duration,
    /// Interval between signature status polls
    pub status_poll_interval: Duration,
    /// Commitment the signature must reach
    pub commitment: CommitmentConfig,
    /// Backoff for the first send
    pub retry_policy: RetryPolicy,
}

impl Default for SendOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(15_000),
            resend_interval: Duration::from_millis(500),
            status_poll_interval: Duration::from_millis(2_000),
            commitment: CommitmentConfig::confirmed(),
            retry_policy: RetryPolicy::default(),
        }
    }
}

/// A confirmed transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendOutcome {
    pub txid: Signature,
    pub slot: u64,
}

/// Sign `instructions` with the payer and `signers`, submit and await
/// confirmation
pub async fn send_transaction_with_retry<R: MintRpc + ?Sized>(
    rpc: &R,
    payer: &dyn Signer,
    instructions: &[Instruction],
    signers: &[&dyn Signer],
    opts: &SendOptions,
) -> Result<SendOutcome, MintError> {
    let blockhash = rpc.latest_blockhash().await?;
    let output = TxBuildOutput::sign(payer, instructions, signers, blockhash)?;

    debug!(
        signature = %output.signature(),
        required_signers = output.required_signers().len(),
        instructions = instructions.len(),
        "Transaction signed"
    );

    send_signed_transaction(rpc, &output, opts).await
}

/// Submit an already signed transaction and await confirmation
pub async fn send_signed_transaction<R: MintRpc + ?Sized>(
    rpc: &R,
    output: &TxBuildOutput,
    opts: &SendOptions,
) -> Result<SendOutcome, MintError> {
    let txid = send_with_backoff(rpc, &output.tx, &opts.retry_policy).await?;

    // The confirmation timeout runs from the first accepted send
    let started_at = Instant::now();
    let deadline_at = started_at + opts.timeout;
    info!(signature = %txid, endpoint = %rpc.endpoint(), "Started awaiting confirmation");

    let deadline = tokio::time::sleep_until(deadline_at);
    tokio::pin!(deadline);

    let mut resend = tokio::time::interval(opts.resend_interval);
    resend.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; the transaction was just sent
    resend.tick().await;

    let mut poll = tokio::time::interval(opts.status_poll_interval);
    poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut resends = 0u32;

    // RPC calls inside the loop share the deadline
    loop {
        tokio::select! {
            _ = &mut deadline => {
                return Err(confirmation_timeout(txid, resends, opts));
            }

            _ = resend.tick() => {
                resends += 1;
                match tokio::time::timeout_at(deadline_at, rpc.send_transaction(&output.tx)).await {
                    Err(_) => return Err(confirmation_timeout(txid, resends, opts)),
                    Ok(Err(e)) => debug!(signature = %txid, error = %e, "Rebroadcast failed"),
                    Ok(Ok(_)) => {}
                }
            }

            _ = poll.tick() => {
                let polled = tokio::time::timeout_at(deadline_at, rpc.signature_status(&txid)).await;
                match polled {
                    Err(_) => return Err(confirmation_timeout(txid, resends, opts)),
                    Ok(Ok(Some(status))) => {
                        if let Some(err) = status.err.as_ref() {
                            warn!(signature = %txid, error = ?err, "Transaction failed");
                            return Err(explain_failure(rpc, &output.tx, txid, format!("{:?}", err)).await);
                        }

                        if status.satisfies_commitment(opts.commitment) {
                            info!(
                                signature = %txid,
                                slot = status.slot,
                                resends = resends,
                                latency_ms = started_at.elapsed().as_millis() as u64,
                                "Transaction confirmed"
                            );
                            return Ok(SendOutcome { txid, slot: status.slot });
                        }

                        debug!(
                            signature = %txid,
                            confirmation_status = ?status.confirmation_status,
                            "Awaiting commitment"
                        );
                    }
                    Ok(Ok(None)) => {
                        debug!(signature = %txid, "Signature not found yet");
                    }
                    Ok(Err(e)) => {
                        warn!(signature = %txid, error = %e, "Signature status poll failed");
                    }
                }
            }
        }
    }
}

fn confirmation_timeout(txid: Signature, resends: u32, opts: &SendOptions) -> MintError {
    let timeout_ms = opts.timeout.as_millis() as u64;
    warn!(
        signature = %txid,
        resends = resends,
        timeout_ms = timeout_ms,
        "Timed out awaiting confirmation"
    );
    MintError::ConfirmationTimeout {
        signature: txid.to_string(),
        timeout_ms,
    }
}

/// First send, retried with backoff while the failure is retryable
async fn send_with_backoff<R: MintRpc + ?Sized>(
    rpc: &R,
    tx: &Transaction,
    policy: &RetryPolicy,
) -> Result<Signature, MintError> {
    let mut attempt = 0u32;
    loop {
        match rpc.send_transaction(tx).await {
            Ok(signature) => return Ok(signature),
            Err(e) if e.is_retryable() => match policy.calculate_delay(attempt) {
                Some(delay) => {
                    warn!(
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Send failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                None => return Err(e.into()),
            },
            Err(e) => return Err(e.into()),
        }
    }
}

/// Turn a failed status into an error carrying the program's own message
///
/// The transaction is simulated to recover its logs. When the simulation
/// fails too, its last `Program log: ` line is the most specific reason
/// available; logs of a simulation that succeeded say nothing about the
/// landed failure, so the status error is kept.
async fn explain_failure<R: MintRpc + ?Sized>(
    rpc: &R,
    tx: &Transaction,
    txid: Signature,
    status_err: String,
) -> MintError {
    let reason = match rpc.simulate_transaction(tx).await {
        Ok(SimulationOutcome { err: Some(sim_err), logs }) => {
            last_program_log(&logs).unwrap_or(sim_err)
        }
        Ok(SimulationOutcome { err: None, .. }) => {
            debug!(signature = %txid, "Simulation did not reproduce the failure");
            status_err
        }
        Err(e) => {
            warn!(signature = %txid, error = %e, "Simulate transaction error");
            status_err
        }
    };

    MintError::TransactionFailed {
        signature: txid.to_string(),
        reason,
    }
}

/// Message of the last `Program log: ` line
pub fn last_program_log(logs: &[String]) -> Option<String> {
    logs.iter()
        .rev()
        .find_map(|line| line.strip_prefix(PROGRAM_LOG_PREFIX))
        .map(str::to_string)
}
