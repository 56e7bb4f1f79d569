//! Candy machine mint orchestration
//!
//! Loads the payer, resolves the cluster, reads the candy machine and
//! submits one transaction that creates the mint, mints a single token to
//! the payer and calls `mint_nft`. Failures are never recovered locally.

use crate::accounts::{candy_machine_address, uuid_from_config_pubkey};
use crate::candy_machine::CandyMachine;
use crate::cluster::Cluster;
use crate::config::Settings;
use crate::observability::TraceContext;
use crate::rpc_manager::{send_transaction_with_retry, MintRpc, SendOptions, SendOutcome};
use crate::structured_logging::StructuredLogger;
use crate::tx_builder::{plan_mint_instructions, MintError, MintPlanInput, MINT_ACCOUNT_LEN};
use crate::wallet::load_wallet_key;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signer},
};
use tokio::time::Instant;
use tracing::{debug, Instrument};

/// Mint one NFT from the candy machine behind `config_address`
///
/// `keypair` is the payer's keypair file and `env` a cluster name or RPC
/// URL. Returns the confirmed transaction signature.
pub async fn mint(keypair: &str, env: &str, config_address: &Pubkey) -> Result<String, MintError> {
    mint_with_settings(keypair, env, config_address, &Settings::default()).await
}

/// [`mint`] with explicit settings
///
/// `settings.rpc.url`, when set, takes precedence over the cluster's
/// public endpoint.
pub async fn mint_with_settings(
    keypair: &str,
    env: &str,
    config_address: &Pubkey,
    settings: &Settings,
) -> Result<String, MintError> {
    let payer = load_wallet_key(keypair)?;

    let url = match settings.rpc.url.as_deref() {
        Some(url) => url.to_string(),
        None => env.parse::<Cluster>()?.url().to_string(),
    };
    let rpc = RpcClient::new_with_timeout_and_commitment(
        url,
        settings.rpc_timeout(),
        settings.commitment()?,
    );

    let opts = settings.send_options()?;
    let outcome = mint_one(&rpc, &payer, config_address, &opts).await?;
    Ok(outcome.txid.to_string())
}

/// Mint through any [`MintRpc`] with an already loaded payer
pub async fn mint_one<R: MintRpc + ?Sized>(
    rpc: &R,
    payer: &Keypair,
    config_address: &Pubkey,
    opts: &SendOptions,
) -> Result<SendOutcome, MintError> {
    let trace = TraceContext::new("candy_machine_mint");
    let logger = StructuredLogger::from_trace(&trace);
    let span = trace.span();

    async move {
        let started_at = Instant::now();
        let mint = Keypair::new();

        let result = mint_with_keypair(rpc, payer, &mint, config_address, opts, &logger).await;
        let latency_ms = started_at.elapsed().as_millis() as u64;

        match &result {
            Ok(outcome) => logger.log_mint_submitted(
                &mint.pubkey(),
                &outcome.txid.to_string(),
                outcome.slot,
                latency_ms,
            ),
            Err(e) => logger.log_mint_failure(&mint.pubkey(), e.category(), &e.to_string(), latency_ms),
        }
        result
    }
    .instrument(span)
    .await
}

async fn mint_with_keypair<R: MintRpc + ?Sized>(
    rpc: &R,
    payer: &Keypair,
    mint: &Keypair,
    config_address: &Pubkey,
    opts: &SendOptions,
    logger: &StructuredLogger,
) -> Result<SendOutcome, MintError> {
    let uuid = uuid_from_config_pubkey(config_address);
    let (candy_machine_address, _bump) = candy_machine_address(config_address, &uuid);
    logger.log_mint_attempt(&candy_machine_address, &mint.pubkey(), &payer.pubkey());

    let data = rpc.account_data(&candy_machine_address).await?;
    let candy_machine = CandyMachine::try_from_account_data(&candy_machine_address, &data)?;
    logger.log_candy_machine_loaded(
        &candy_machine_address,
        candy_machine.price(),
        candy_machine.items_remaining(),
    );

    let mint_rent_lamports = rpc.minimum_balance_for_rent_exemption(MINT_ACCOUNT_LEN).await?;

    // Only ever a delegate; it never signs
    let transfer_authority = candy_machine.payment_mint().map(|_| Keypair::new().pubkey());

    let plan = plan_mint_instructions(&MintPlanInput {
        payer: payer.pubkey(),
        mint: mint.pubkey(),
        config_address: *config_address,
        candy_machine_address,
        candy_machine: &candy_machine,
        mint_rent_lamports,
        transfer_authority,
    })?;

    if let (Some(payment_mint), Some(payment_account)) =
        (candy_machine.payment_mint(), plan.payment_token_account)
    {
        logger.log_payment_flow(&payment_mint, &payment_account, candy_machine.price());
    }

    debug!(
        instructions = plan.instructions.len(),
        token_account = %plan.user_token_account,
        metadata = %plan.metadata,
        master_edition = %plan.master_edition,
        "Mint instructions planned"
    );

    send_transaction_with_retry(rpc, payer, &plan.instructions, &[mint as &dyn Signer, payer], opts).await
}
