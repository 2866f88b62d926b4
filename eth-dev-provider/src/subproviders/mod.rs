//! Subprovider middleware implementations
//!
//! Each subprovider inspects a JSON-RPC request and either answers it or passes
//! it down the stack. The factory in `crate::factory` decides which of these
//! end up in the pipeline.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ProviderError;

pub mod dev_chain;
pub mod empty_wallet;
pub mod fake_gas;
pub mod rpc;

pub use dev_chain::{DevChainConfig, DevChainSubprovider};
pub use empty_wallet::EmptyWalletSubprovider;
pub use fake_gas::FakeGasEstimateSubprovider;
pub use rpc::RpcSubprovider;

/// Result of offering a request to a subprovider
#[derive(Debug)]
pub enum Outcome {
    /// The subprovider produced a result for this method
    Handled(Value),

    /// The subprovider does not answer this method; try the next one
    NotHandled,
}

/// A single middleware in the provider pipeline
#[async_trait]
pub trait Subprovider: Send + Sync {
    /// Short name used in logs and diagnostics
    fn name(&self) -> &'static str;

    /// Offer a JSON-RPC request to this subprovider
    ///
    /// Returning `Outcome::NotHandled` passes the request to the next
    /// subprovider in the stack. Errors abort the dispatch and surface as
    /// JSON-RPC errors to the caller.
    async fn handle(&self, method: &str, params: &[Value]) -> Result<Outcome, ProviderError>;

    /// Hook run when the engine starts, before any request is served
    async fn start(&self) -> Result<(), ProviderError> {
        Ok(())
    }
}
