//! End-to-end mint flow against the scripted RPC

use crate::accounts::{
    candy_machine_address, metadata_address, token_wallet, uuid_from_config_pubkey,
    CANDY_MACHINE_PROGRAM_ID, TOKEN_METADATA_PROGRAM_ID,
};
use crate::mint::mint_one;
use crate::rpc_manager::{RpcManagerError, SendOptions, SimulationOutcome};
use crate::test_utils::{confirmed_status, failed_status, sample_candy_machine, MockRpc};
use crate::tx_builder::MintError;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    system_program,
    transaction::Transaction,
};

async fn mock_with_machine(token_mint: Option<Pubkey>) -> (MockRpc, Pubkey) {
    let rpc = MockRpc::new();
    let config = Pubkey::new_unique();
    let (address, _) = candy_machine_address(&config, &uuid_from_config_pubkey(&config));
    let machine = sample_candy_machine(config, token_mint);
    rpc.insert_account(address, machine.to_account_data().unwrap())
        .await;
    (rpc, config)
}

fn program_ids(tx: &Transaction) -> Vec<Pubkey> {
    tx.message
        .instructions
        .iter()
        .map(|ix| tx.message.account_keys[ix.program_id_index as usize])
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_mint_without_payment_token() {
    let (rpc, config) = mock_with_machine(None).await;
    rpc.push_status(Some(confirmed_status(42))).await;
    let payer = Keypair::new();

    let outcome = mint_one(&rpc, &payer, &config, &SendOptions::default())
        .await
        .unwrap();
    assert_eq!(outcome.slot, 42);

    let tx = rpc.last_sent().await.unwrap();
    assert_eq!(outcome.txid, tx.signatures[0]);
    assert!(tx.verify().is_ok());
    assert_eq!(tx.message.account_keys[0], payer.pubkey());
    // Payer and the new mint
    assert_eq!(tx.message.header.num_required_signatures, 2);
    assert_eq!(tx.message.recent_blockhash, rpc.blockhash);

    assert_eq!(
        program_ids(&tx),
        vec![
            system_program::id(),
            spl_token::id(),
            spl_associated_token_account::id(),
            spl_token::id(),
            CANDY_MACHINE_PROGRAM_ID,
        ]
    );

    let mint = tx.message.account_keys[1];
    assert!(tx.message.account_keys.contains(&metadata_address(&mint)));
    assert!(tx.message.account_keys.contains(&token_wallet(&payer.pubkey(), &mint)));
    assert!(tx.message.account_keys.contains(&TOKEN_METADATA_PROGRAM_ID));
}

#[tokio::test(start_paused = true)]
async fn test_mint_with_payment_token() {
    let payment_mint = Pubkey::new_unique();
    let (rpc, config) = mock_with_machine(Some(payment_mint)).await;
    rpc.push_status(None).await;
    rpc.push_status(Some(confirmed_status(7))).await;
    let payer = Keypair::new();

    let outcome = mint_one(&rpc, &payer, &config, &SendOptions::default())
        .await
        .unwrap();
    assert_eq!(outcome.slot, 7);

    let tx = rpc.last_sent().await.unwrap();
    // The transfer authority is only a delegate
    assert_eq!(tx.message.header.num_required_signatures, 2);
    assert_eq!(
        program_ids(&tx),
        vec![
            system_program::id(),
            spl_token::id(),
            spl_associated_token_account::id(),
            spl_token::id(),
            spl_token::id(),
            CANDY_MACHINE_PROGRAM_ID,
            spl_token::id(),
        ]
    );

    let payment_account = token_wallet(&payer.pubkey(), &payment_mint);
    assert!(tx.message.account_keys.contains(&payment_account));
}

#[tokio::test(start_paused = true)]
async fn test_missing_candy_machine_account() {
    let rpc = MockRpc::new();
    let payer = Keypair::new();

    let result = mint_one(&rpc, &payer, &Pubkey::new_unique(), &SendOptions::default()).await;
    assert!(matches!(
        result,
        Err(MintError::Rpc(RpcManagerError::AccountNotFound { .. }))
    ));
    assert_eq!(rpc.sent_count().await, 0);
}

#[tokio::test(start_paused = true)]
async fn test_account_is_not_a_candy_machine() {
    let rpc = MockRpc::new();
    let config = Pubkey::new_unique();
    let (address, _) = candy_machine_address(&config, &uuid_from_config_pubkey(&config));
    rpc.insert_account(address, vec![7u8; 128]).await;

    let result = mint_one(&rpc, &Keypair::new(), &config, &SendOptions::default()).await;
    match result {
        Err(MintError::AccountDecode { account, .. }) => assert_eq!(account, address.to_string()),
        other => panic!("expected decode error, got {:?}", other),
    }
    assert_eq!(rpc.sent_count().await, 0);
}

#[tokio::test(start_paused = true)]
async fn test_program_failure_reports_last_log() {
    let (rpc, config) = mock_with_machine(None).await;
    rpc.push_status(Some(failed_status(9, 0x137))).await;
    rpc.set_simulation(SimulationOutcome {
        err: Some("InstructionError(4, Custom(311))".to_string()),
        logs: vec![
            "Program cndyAnrLdpjq1Ssp1z8xxDsB8dxe7u4HL5Nxi2K5WXZ invoke [1]".to_string(),
            "Program log: Candy machine is empty!".to_string(),
        ],
    })
    .await;

    let result = mint_one(&rpc, &Keypair::new(), &config, &SendOptions::default()).await;
    match result {
        Err(MintError::TransactionFailed { reason, .. }) => {
            assert_eq!(reason, "Candy machine is empty!")
        }
        other => panic!("expected transaction failure, got {:?}", other),
    }
}
