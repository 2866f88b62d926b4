//! Tests for the factory: documented defaults, the mutual exclusivity guard
//! and lazy database directory creation.

use crate::{in_process_config, init_logger};
use eth_dev_provider::{
    config::ProviderConfig,
    error::ProviderError,
    factory::{build_provider, get_rpc_provider},
};
use serde_json::json;

#[test]
fn test_documented_defaults() {
    let config = ProviderConfig::default();

    assert_eq!(config.total_accounts(), 10);
    assert!(config.has_addresses());
    assert!(!config.use_in_process_chain());
    assert!(config.vm_errors_on_rpc_response());
    assert!(config.fake_gas_estimate());
    assert!(!config.allow_unlimited_contract_size());
    assert!(config.rpc_url.is_none());
    assert!(config.database_path.is_none());
    assert!(config.fork_url.is_none());
    assert!(config.block_time_secs.is_none());
    assert!(config.unlocked_accounts.is_empty());
}

#[test]
fn test_boolean_flags_load_from_environment() {
    init_logger();

    std::env::set_var("HAS_ADDRESSES", "false");
    std::env::set_var("FAKE_GAS_ESTIMATE", "0");
    std::env::set_var("VM_ERRORS_ON_RPC_RESPONSE", "TRUE");
    std::env::set_var("ALLOW_UNLIMITED_CONTRACT_SIZE", "1");

    let config = eth_dev_provider::config::Config::from_env().expect("Failed to load config");
    assert!(!config.provider.has_addresses());
    assert!(!config.provider.fake_gas_estimate());
    assert!(config.provider.vm_errors_on_rpc_response());
    assert!(config.provider.allow_unlimited_contract_size());

    std::env::remove_var("HAS_ADDRESSES");
    std::env::remove_var("FAKE_GAS_ESTIMATE");
    std::env::remove_var("VM_ERRORS_ON_RPC_RESPONSE");
    std::env::remove_var("ALLOW_UNLIMITED_CONTRACT_SIZE");
}

#[test]
fn test_conflicting_configuration_is_rejected() {
    init_logger();

    let config = ProviderConfig {
        use_in_process_chain: Some(true),
        rpc_url: Some("http://localhost:8545".to_string()),
        ..ProviderConfig::default()
    };

    let result = build_provider(&config);
    assert!(matches!(result, Err(ProviderError::ConflictingConfig(_))));
}

#[test]
fn test_in_process_chain_without_rpc_url_is_accepted() {
    init_logger();

    let engine = build_provider(&in_process_config()).expect("Failed to build pipeline");
    assert_eq!(engine.subprovider_names(), vec!["fake-gas-estimate", "dev-chain"]);
}

#[test]
fn test_forwarding_pipeline_stack_order() {
    init_logger();

    let config = ProviderConfig {
        rpc_url: Some("http://localhost:8545".to_string()),
        has_addresses: Some(false),
        ..ProviderConfig::default()
    };

    let engine = build_provider(&config).expect("Failed to build pipeline");
    assert_eq!(
        engine.subprovider_names(),
        vec!["empty-wallet", "fake-gas-estimate", "rpc"]
    );
}

#[test]
fn test_fake_gas_estimate_can_be_disabled() {
    init_logger();

    let config = ProviderConfig {
        use_in_process_chain: Some(true),
        fake_gas_estimate: Some(false),
        ..ProviderConfig::default()
    };

    let engine = build_provider(&config).expect("Failed to build pipeline");
    assert_eq!(engine.subprovider_names(), vec!["dev-chain"]);
}

#[test]
fn test_database_directory_is_created_lazily() {
    init_logger();

    let tmp = tempfile::tempdir().expect("Failed to create temp dir");
    let database_path = tmp.path().join("snapshot");
    assert!(!database_path.exists());

    let config = ProviderConfig {
        use_in_process_chain: Some(true),
        database_path: Some(database_path.clone()),
        ..ProviderConfig::default()
    };

    build_provider(&config).expect("Failed to build pipeline");
    assert!(database_path.is_dir());
}

#[test]
fn test_existing_database_directory_is_left_alone() {
    init_logger();

    let tmp = tempfile::tempdir().expect("Failed to create temp dir");
    let database_path = tmp.path().join("snapshot");
    std::fs::create_dir(&database_path).expect("Failed to create directory");
    let sentinel = database_path.join("sentinel");
    std::fs::write(&sentinel, "keep me").expect("Failed to write sentinel");

    let config = ProviderConfig {
        use_in_process_chain: Some(true),
        database_path: Some(database_path),
        ..ProviderConfig::default()
    };

    build_provider(&config).expect("Failed to build pipeline");
    assert!(sentinel.exists());
}

#[actix_web::test]
async fn test_requests_before_start_are_rejected() {
    init_logger();

    let engine = build_provider(&in_process_config()).expect("Failed to build pipeline");
    assert!(!engine.is_started());

    let result = engine.request("eth_blockNumber", &[]).await;
    assert!(matches!(result, Err(ProviderError::EngineNotStarted)));
}

#[actix_web::test]
async fn test_unknown_method_reports_not_found() {
    init_logger();

    let engine = get_rpc_provider(&in_process_config())
        .await
        .expect("Failed to start pipeline");

    let result = engine.request("eth_madeUpMethod", &[json!("0x1")]).await;
    match result {
        Err(ProviderError::Rpc(detail)) => assert_eq!(detail.code, -32601),
        other => panic!("Expected method-not-found error, got {:?}", other.map(|_| ())),
    }
}

#[actix_web::test]
async fn test_empty_wallet_shadows_dev_chain_accounts() {
    init_logger();

    let config = ProviderConfig {
        use_in_process_chain: Some(true),
        has_addresses: Some(false),
        ..ProviderConfig::default()
    };

    let engine = get_rpc_provider(&config).await.expect("Failed to start pipeline");
    let accounts = engine.request("eth_accounts", &[]).await.expect("Request failed");
    assert_eq!(accounts, json!([]));
}
