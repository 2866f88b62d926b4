//! Tests for chain state persistence under a database directory.

use crate::{init_logger, in_process_config};
use eth_dev_provider::{config::ProviderConfig, factory::get_rpc_provider};
use serde_json::json;

#[actix_web::test]
async fn test_chain_state_survives_a_restart() {
    init_logger();

    let tmp = tempfile::tempdir().expect("Failed to create temp dir");
    let database_path = tmp.path().join("snapshot");
    let config = ProviderConfig {
        database_path: Some(database_path.clone()),
        ..in_process_config()
    };

    // First run: mine a transfer, then drop the engine
    let tx_hash = {
        let engine = get_rpc_provider(&config).await.expect("Failed to start pipeline");
        let accounts = engine
            .request("eth_accounts", &[])
            .await
            .expect("eth_accounts failed");
        let from = accounts[0].clone();
        let to = accounts[1].clone();
        engine
            .request(
                "eth_sendTransaction",
                &[json!({"from": from, "to": to, "value": "0xde0b6b3a7640000"})],
            )
            .await
            .expect("eth_sendTransaction failed")
    };

    assert!(database_path.join("chain.json").exists());

    // Second run over the same database: history and state are still there
    let engine = get_rpc_provider(&config).await.expect("Failed to restart pipeline");

    let number = engine.request("eth_blockNumber", &[]).await.expect("Request failed");
    assert_eq!(number, json!("0x1"));

    let receipt = engine
        .request("eth_getTransactionReceipt", &[tx_hash])
        .await
        .expect("Request failed");
    assert_eq!(receipt["status"], json!("0x1"));

    let accounts = engine
        .request("eth_accounts", &[])
        .await
        .expect("eth_accounts failed");
    let nonce = engine
        .request("eth_getTransactionCount", &[accounts[0].clone(), json!("latest")])
        .await
        .expect("Request failed");
    assert_eq!(nonce, json!("0x1"));
}

#[actix_web::test]
async fn test_no_state_file_without_database_path() {
    init_logger();

    let engine = get_rpc_provider(&in_process_config())
        .await
        .expect("Failed to start pipeline");
    engine.request("evm_mine", &[]).await.expect("evm_mine failed");

    assert!(!std::path::Path::new("chain.json").exists());
}
