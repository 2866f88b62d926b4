//! Tests for the in-process development chain: accounts, transfers, receipts,
//! VM error reporting and contract creation.

use crate::{in_process_config, init_logger};
use alloy::primitives::U256;
use eth_dev_provider::{
    config::ProviderConfig,
    engine::ProviderEngine,
    error::ProviderError,
    factory::get_rpc_provider,
    models::jsonrpc::parse_hex_u256,
    subproviders::{DevChainConfig, DevChainSubprovider},
};
use serde_json::{json, Value};
use std::time::Duration;

/// One ether in wei.
fn ether(amount: u64) -> U256 {
    U256::from(amount) * U256::from(10u64).pow(U256::from(18))
}

async fn start_chain(config: &ProviderConfig) -> ProviderEngine {
    get_rpc_provider(config).await.expect("Failed to start pipeline")
}

async fn accounts_of(engine: &ProviderEngine) -> Vec<String> {
    let accounts = engine
        .request("eth_accounts", &[])
        .await
        .expect("eth_accounts failed");
    accounts
        .as_array()
        .expect("accounts should be an array")
        .iter()
        .map(|a| a.as_str().expect("account should be a string").to_string())
        .collect()
}

async fn balance_of(engine: &ProviderEngine, address: &str) -> U256 {
    let balance = engine
        .request("eth_getBalance", &[json!(address), json!("latest")])
        .await
        .expect("eth_getBalance failed");
    parse_hex_u256(balance.as_str().expect("balance should be a string"))
        .expect("balance should be hex")
}

#[actix_web::test]
async fn test_deterministic_funded_accounts() {
    init_logger();

    let first = start_chain(&in_process_config()).await;
    let second = start_chain(&in_process_config()).await;

    let first_accounts = accounts_of(&first).await;
    let second_accounts = accounts_of(&second).await;

    assert_eq!(first_accounts.len(), 10);
    assert_eq!(first_accounts, second_accounts);

    for account in &first_accounts {
        assert_eq!(balance_of(&first, account).await, ether(100));
    }
}

#[actix_web::test]
async fn test_genesis_block_is_sealed_on_start() {
    init_logger();

    let engine = start_chain(&in_process_config()).await;

    let number = engine.request("eth_blockNumber", &[]).await.expect("Request failed");
    assert_eq!(number, json!("0x0"));

    let genesis = engine
        .request("eth_getBlockByNumber", &[json!("earliest"), json!(false)])
        .await
        .expect("Request failed");
    assert_eq!(genesis["number"], json!("0x0"));
    assert_eq!(genesis["transactions"], json!([]));
}

#[actix_web::test]
async fn test_fake_gas_estimate_short_circuits() {
    init_logger();

    let engine = start_chain(&in_process_config()).await;
    let accounts = accounts_of(&engine).await;

    // The fake estimator answers before the chain, regardless of the transaction
    let estimate = engine
        .request(
            "eth_estimateGas",
            &[json!({"from": accounts[0], "to": accounts[1], "value": "0x1"})],
        )
        .await
        .expect("Request failed");
    assert_eq!(estimate, json!("0x895440")); // 9,000,000
}

#[actix_web::test]
async fn test_intrinsic_estimate_when_fake_gas_disabled() {
    init_logger();

    let config = ProviderConfig {
        fake_gas_estimate: Some(false),
        ..in_process_config()
    };
    let engine = start_chain(&config).await;
    let accounts = accounts_of(&engine).await;

    let estimate = engine
        .request(
            "eth_estimateGas",
            &[json!({"from": accounts[0], "to": accounts[1], "value": "0x1"})],
        )
        .await
        .expect("Request failed");
    assert_eq!(estimate, json!("0x5208")); // 21,000
}

#[actix_web::test]
async fn test_value_transfer_mines_a_block() {
    init_logger();

    let engine = start_chain(&in_process_config()).await;
    let accounts = accounts_of(&engine).await;

    let tx_hash = engine
        .request(
            "eth_sendTransaction",
            &[json!({
                "from": accounts[0],
                "to": accounts[1],
                "value": format!("0x{:x}", ether(1)),
            })],
        )
        .await
        .expect("eth_sendTransaction failed");
    let tx_hash = tx_hash.as_str().expect("hash should be a string").to_string();

    // Instamine: the transaction lands in block 1 immediately
    let number = engine.request("eth_blockNumber", &[]).await.expect("Request failed");
    assert_eq!(number, json!("0x1"));

    let receipt = engine
        .request("eth_getTransactionReceipt", &[json!(tx_hash)])
        .await
        .expect("Request failed");
    assert_eq!(receipt["status"], json!("0x1"));
    assert_eq!(receipt["blockNumber"], json!("0x1"));

    // Recipient was credited, sender paid value plus fee and consumed a nonce
    assert_eq!(balance_of(&engine, &accounts[1]).await, ether(101));
    assert!(balance_of(&engine, &accounts[0]).await < ether(99));

    let nonce = engine
        .request("eth_getTransactionCount", &[json!(accounts[0]), json!("latest")])
        .await
        .expect("Request failed");
    assert_eq!(nonce, json!("0x1"));

    let tx = engine
        .request("eth_getTransactionByHash", &[json!(tx_hash)])
        .await
        .expect("Request failed");
    assert_eq!(tx["blockNumber"], json!("0x1"));
    assert_eq!(tx["nonce"], json!("0x0"));
}

#[actix_web::test]
async fn test_unknown_sender_is_rejected() {
    init_logger();

    let engine = start_chain(&in_process_config()).await;

    let result = engine
        .request(
            "eth_sendTransaction",
            &[json!({
                "from": "0x00000000000000000000000000000000000000ff",
                "to": "0x0000000000000000000000000000000000000001",
                "value": "0x1",
            })],
        )
        .await;

    match result {
        Err(ProviderError::Rpc(detail)) => {
            assert_eq!(detail.code, -32000);
            assert!(detail.message.contains("sender account not recognized"));
        }
        other => panic!("Expected sender rejection, got {:?}", other.map(|_| ())),
    }
}

#[actix_web::test]
async fn test_unlocked_account_may_send() {
    init_logger();

    let stranger = "0x00000000000000000000000000000000000000ff";
    let config = ProviderConfig {
        unlocked_accounts: vec![stranger.parse().expect("valid address")],
        vm_errors_on_rpc_response: Some(false),
        ..in_process_config()
    };
    let engine = start_chain(&config).await;

    // The stranger has no funds, but with VM errors suppressed the transaction
    // still mines with a failed receipt instead of being rejected outright.
    let tx_hash = engine
        .request(
            "eth_sendTransaction",
            &[json!({
                "from": stranger,
                "to": "0x0000000000000000000000000000000000000001",
                "value": "0x1",
            })],
        )
        .await
        .expect("eth_sendTransaction failed");

    let receipt = engine
        .request("eth_getTransactionReceipt", &[tx_hash])
        .await
        .expect("Request failed");
    assert_eq!(receipt["status"], json!("0x0"));
}

#[actix_web::test]
async fn test_vm_errors_surface_on_rpc_response_by_default() {
    init_logger();

    let engine = start_chain(&in_process_config()).await;
    let accounts = accounts_of(&engine).await;

    // Spending far more than the funded balance must fail loudly
    let result = engine
        .request(
            "eth_sendTransaction",
            &[json!({
                "from": accounts[0],
                "to": accounts[1],
                "value": format!("0x{:x}", ether(1_000)),
            })],
        )
        .await;

    match result {
        Err(ProviderError::Rpc(detail)) => {
            assert!(detail.message.contains("VM Exception"));
        }
        other => panic!("Expected VM exception, got {:?}", other.map(|_| ())),
    }
}

#[actix_web::test]
async fn test_suppressed_vm_errors_produce_failed_receipts() {
    init_logger();

    let config = ProviderConfig {
        vm_errors_on_rpc_response: Some(false),
        ..in_process_config()
    };
    let engine = start_chain(&config).await;
    let accounts = accounts_of(&engine).await;

    let tx_hash = engine
        .request(
            "eth_sendTransaction",
            &[json!({
                "from": accounts[0],
                "to": accounts[1],
                "value": format!("0x{:x}", ether(1_000)),
            })],
        )
        .await
        .expect("eth_sendTransaction failed");

    let receipt = engine
        .request("eth_getTransactionReceipt", &[tx_hash])
        .await
        .expect("Request failed");
    assert_eq!(receipt["status"], json!("0x0"));

    // The failed transfer must not move any funds
    assert_eq!(balance_of(&engine, &accounts[1]).await, ether(100));
}

#[actix_web::test]
async fn test_contract_creation_records_code() {
    init_logger();

    let engine = start_chain(&in_process_config()).await;
    let accounts = accounts_of(&engine).await;

    let tx_hash = engine
        .request(
            "eth_sendTransaction",
            &[json!({"from": accounts[0], "data": "0x60016000"})],
        )
        .await
        .expect("eth_sendTransaction failed");

    let receipt = engine
        .request("eth_getTransactionReceipt", &[tx_hash])
        .await
        .expect("Request failed");
    assert_eq!(receipt["status"], json!("0x1"));
    let contract_address = receipt["contractAddress"]
        .as_str()
        .expect("contractAddress should be set")
        .to_string();

    let code = engine
        .request("eth_getCode", &[json!(contract_address), json!("latest")])
        .await
        .expect("Request failed");
    assert_eq!(code, json!("0x60016000"));
}

#[actix_web::test]
async fn test_oversized_contract_is_rejected_unless_allowed() {
    init_logger();

    let oversized = format!("0x{}", "00".repeat(24_577));

    let engine = start_chain(&in_process_config()).await;
    let accounts = accounts_of(&engine).await;
    let result = engine
        .request(
            "eth_sendTransaction",
            &[json!({"from": accounts[0], "data": oversized})],
        )
        .await;
    match result {
        Err(ProviderError::Rpc(detail)) => {
            assert!(detail.message.contains("contract code size exceeds"));
        }
        other => panic!("Expected size rejection, got {:?}", other.map(|_| ())),
    }

    let config = ProviderConfig {
        allow_unlimited_contract_size: Some(true),
        ..in_process_config()
    };
    let engine = start_chain(&config).await;
    let accounts = accounts_of(&engine).await;
    let oversized = format!("0x{}", "00".repeat(24_577));
    engine
        .request(
            "eth_sendTransaction",
            &[json!({"from": accounts[0], "data": oversized})],
        )
        .await
        .expect("Oversized creation should be accepted when allowed");
}

#[actix_web::test]
async fn test_evm_mine_seals_empty_blocks() {
    init_logger();

    let engine = start_chain(&in_process_config()).await;

    engine.request("evm_mine", &[]).await.expect("evm_mine failed");
    engine.request("evm_mine", &[]).await.expect("evm_mine failed");

    let number = engine.request("eth_blockNumber", &[]).await.expect("Request failed");
    assert_eq!(number, json!("0x2"));

    let block = engine
        .request("eth_getBlockByNumber", &[json!("latest"), json!(false)])
        .await
        .expect("Request failed");
    assert_eq!(block["transactions"], json!([]));
    assert_ne!(block["parentHash"], Value::Null);
}

#[actix_web::test]
async fn test_explicit_nonce_must_match_account_nonce() {
    init_logger();

    let engine = start_chain(&in_process_config()).await;
    let accounts = accounts_of(&engine).await;

    // A stale or future nonce is rejected outright
    let result = engine
        .request(
            "eth_sendTransaction",
            &[json!({
                "from": accounts[0],
                "to": accounts[1],
                "value": "0x1",
                "nonce": "0x5",
            })],
        )
        .await;
    match result {
        Err(ProviderError::Rpc(detail)) => {
            assert_eq!(detail.code, -32000);
            assert!(detail.message.contains("correct nonce"));
        }
        other => panic!("Expected nonce rejection, got {:?}", other.map(|_| ())),
    }

    // The matching nonce goes through
    engine
        .request(
            "eth_sendTransaction",
            &[json!({
                "from": accounts[0],
                "to": accounts[1],
                "value": "0x1",
                "nonce": "0x0",
            })],
        )
        .await
        .expect("eth_sendTransaction with the correct nonce failed");

    let nonce = engine
        .request("eth_getTransactionCount", &[json!(accounts[0]), json!("latest")])
        .await
        .expect("Request failed");
    assert_eq!(nonce, json!("0x1"));
}

#[actix_web::test]
async fn test_interval_mining_queues_then_seals() {
    init_logger();

    let tmp = tempfile::tempdir().expect("Failed to create temp dir");
    let log_path = tmp.path().join("devchain.log");

    let chain_config = DevChainConfig {
        block_time_secs: Some(2),
        log_path: log_path.clone(),
        ..DevChainConfig::default()
    };
    let mut engine = ProviderEngine::new();
    engine.add_subprovider(Box::new(
        DevChainSubprovider::new(chain_config).expect("Failed to build dev chain"),
    ));
    engine.start().await.expect("Failed to start engine");

    let accounts = accounts_of(&engine).await;
    let tx_hash = engine
        .request(
            "eth_sendTransaction",
            &[json!({
                "from": accounts[0],
                "to": accounts[1],
                "value": format!("0x{:x}", ether(1)),
            })],
        )
        .await
        .expect("eth_sendTransaction failed");

    // With interval mining the transaction only queues; no block yet
    let number = engine.request("eth_blockNumber", &[]).await.expect("Request failed");
    assert_eq!(number, json!("0x0"));
    let receipt = engine
        .request("eth_getTransactionReceipt", &[tx_hash.clone()])
        .await
        .expect("Request failed");
    assert_eq!(receipt, Value::Null);

    // After the interval the miner has sealed the block
    tokio::time::sleep(Duration::from_millis(3_000)).await;

    let number = engine.request("eth_blockNumber", &[]).await.expect("Request failed");
    assert_eq!(number, json!("0x1"));
    let receipt = engine
        .request("eth_getTransactionReceipt", &[tx_hash])
        .await
        .expect("Request failed");
    assert_eq!(receipt["status"], json!("0x1"));
    assert_eq!(receipt["blockNumber"], json!("0x1"));
    assert_eq!(balance_of(&engine, &accounts[1]).await, ether(101));

    // The chain log received the genesis, queue and seal events
    let log = std::fs::read_to_string(&log_path).expect("Failed to read chain log");
    assert!(log.contains("Genesis block sealed"));
    assert!(log.contains("queued"));
    assert!(log.contains("Block 1 sealed with 1 transactions"));
}

#[actix_web::test]
async fn test_chain_identity_methods() {
    init_logger();

    let engine = start_chain(&in_process_config()).await;

    let chain_id = engine.request("eth_chainId", &[]).await.expect("Request failed");
    assert_eq!(chain_id, json!("0x32")); // network id 50

    let net_version = engine.request("net_version", &[]).await.expect("Request failed");
    assert_eq!(net_version, json!("50"));

    let client_version = engine
        .request("web3_clientVersion", &[])
        .await
        .expect("Request failed");
    assert!(client_version
        .as_str()
        .expect("client version should be a string")
        .starts_with("EthDevProvider/"));
}
