use std::fs;

use tracing::{debug, info};

use crate::config::{env_boolean, ProviderConfig, DEFAULT_RPC_URL, GAS_LIMIT, VERBOSE_DEVCHAIN_ENV};
use crate::engine::ProviderEngine;
use crate::error::ProviderError;
use crate::subproviders::{
    DevChainConfig, DevChainSubprovider, EmptyWalletSubprovider, FakeGasEstimateSubprovider,
    RpcSubprovider,
};

/// Assemble a provider engine from the given options
///
/// Translates the flat options record into a subprovider stack:
///
/// 1. `EmptyWalletSubprovider` when the provider should expose no addresses
/// 2. `FakeGasEstimateSubprovider` unless fake gas estimation is disabled
/// 3. Either the in-process development chain or a forwarding RPC subprovider
///
/// Configuring both the in-process chain and an explicit remote RPC URL is an
/// error. When a database path is given for the development chain and the
/// directory does not exist yet, it is created here.
///
/// The returned engine has not been started; see [`get_rpc_provider`] for the
/// build-and-start entry point.
pub fn build_provider(config: &ProviderConfig) -> Result<ProviderEngine, ProviderError> {
    let mut engine = ProviderEngine::new();

    if !config.has_addresses() {
        engine.add_subprovider(Box::new(EmptyWalletSubprovider));
    }
    if config.fake_gas_estimate() {
        engine.add_subprovider(Box::new(FakeGasEstimateSubprovider::new(GAS_LIMIT)));
    }

    if config.use_in_process_chain() {
        if config.rpc_url.is_some() {
            return Err(ProviderError::ConflictingConfig(
                "cannot use both the in-process dev chain and a remote RPC endpoint".to_string(),
            ));
        }

        if let Some(database_path) = &config.database_path {
            // Working with a local DB snapshot requires the directory to exist
            if !database_path.exists() {
                debug!("Creating database directory {}", database_path.display());
                fs::create_dir(database_path)?;
            }
        }

        let chain_config = DevChainConfig {
            total_accounts: config.total_accounts(),
            vm_errors_on_rpc_response: config.vm_errors_on_rpc_response(),
            allow_unlimited_contract_size: config.allow_unlimited_contract_size(),
            database_path: config.database_path.clone(),
            fork_url: config.fork_url.clone(),
            block_time_secs: config.block_time_secs,
            unlocked_accounts: config.unlocked_accounts.clone(),
            verbose: env_boolean(VERBOSE_DEVCHAIN_ENV),
            ..DevChainConfig::default()
        };
        engine.add_subprovider(Box::new(DevChainSubprovider::new(chain_config)?));
    } else {
        let url = config
            .rpc_url
            .clone()
            .unwrap_or_else(|| DEFAULT_RPC_URL.to_string());
        engine.add_subprovider(Box::new(RpcSubprovider::new(&url)?));
    }

    info!("Provider pipeline: {:?}", engine.subprovider_names());
    Ok(engine)
}

/// Assemble a provider engine and start it
///
/// This is the one-call entry point for tests and the server binary: it builds
/// the pipeline from the options record and runs every subprovider's start
/// hook before returning.
pub async fn get_rpc_provider(config: &ProviderConfig) -> Result<ProviderEngine, ProviderError> {
    let engine = build_provider(config)?;
    engine.start().await?;
    Ok(engine)
}
