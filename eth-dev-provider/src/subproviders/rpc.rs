use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use crate::error::ProviderError;
use crate::rpc::RpcClient;
use crate::subproviders::{Outcome, Subprovider};

/// Subprovider forwarding every request to a remote JSON-RPC endpoint
///
/// This is the terminal middleware of a forwarding pipeline: it handles every
/// method by passing it verbatim to the configured node and returning the raw
/// result. Upstream JSON-RPC errors are propagated with their original codes.
pub struct RpcSubprovider {
    /// HTTP client for the upstream node
    client: RpcClient,
}

impl RpcSubprovider {
    /// Create a forwarding subprovider for the given endpoint URL
    pub fn new(rpc_url: &str) -> Result<Self, ProviderError> {
        Ok(Self {
            client: RpcClient::new(rpc_url)?,
        })
    }
}

#[async_trait]
impl Subprovider for RpcSubprovider {
    fn name(&self) -> &'static str {
        "rpc"
    }

    async fn handle(&self, method: &str, params: &[Value]) -> Result<Outcome, ProviderError> {
        let result = self.client.raw_request(method, params).await?;
        Ok(Outcome::Handled(result))
    }

    /// Verify the upstream node is reachable before serving requests
    async fn start(&self) -> Result<(), ProviderError> {
        let block_number = self.client.check_connection().await?;
        info!(
            "Connected to {}, latest block number: {}",
            self.client.url(),
            block_number
        );
        Ok(())
    }
}
