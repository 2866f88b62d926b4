//! Integration tests for the provider pipeline
//!
//! Tests for the factory guards, the subprovider stack and the in-process
//! development chain.

use std::sync::Once;
use tracing_subscriber::EnvFilter;

use eth_dev_provider::config::ProviderConfig;

pub mod chain_tests;
pub mod factory_tests;
pub mod persistence_tests;

static INIT: Once = Once::new();

/// Initializes the global logger (only once).
pub fn init_logger() {
    INIT.call_once(|| {
        let filter = EnvFilter::from_default_env()
            .add_directive("eth_dev_provider=info".parse().unwrap())
            .add_directive("actix_web=error".parse().unwrap())
            .add_directive("hyper=warn".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .init();
    });
}

/// Options for a default in-process development chain.
pub fn in_process_config() -> ProviderConfig {
    ProviderConfig {
        use_in_process_chain: Some(true),
        ..ProviderConfig::default()
    }
}
