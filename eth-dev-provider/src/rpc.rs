use std::sync::Arc;

use alloy::{
    // Import the pre-defined typed Ethereum network
    network::Ethereum,
    providers::{Provider, ProviderBuilder},
    transports::{RpcError, TransportError},
};
use serde_json::Value;
use tracing::debug;

use crate::error::ProviderError;
use crate::models::jsonrpc::JsonRpcErrorDetail;

/// Ethereum RPC client for upstream node interactions
///
/// This client provides both a typed interface and a raw JSON-RPC passthrough
/// for communicating with Ethereum nodes. It uses the Alloy typed providers to
/// ensure type safety in RPC interactions.
#[derive(Clone)]
pub struct RpcClient {
    /// Typed provider for Ethereum network
    provider: Arc<dyn Provider<Ethereum>>,

    /// Endpoint URL, kept for diagnostics
    url: String,
}

impl RpcClient {
    /// Create a new RPC client with an HTTP provider
    ///
    /// Construction is synchronous and does not touch the network; call
    /// [`check_connection`](Self::check_connection) to verify the endpoint.
    ///
    /// # Arguments
    ///
    /// * `rpc_url` - URL of the Ethereum RPC endpoint
    ///
    /// # Returns
    ///
    /// * `Result<Self, ProviderError>` - New client instance or an error
    pub fn new(rpc_url: &str) -> Result<Self, ProviderError> {
        let parsed = rpc_url
            .parse()
            .map_err(|e| ProviderError::RpcConnection(format!("Bad URL {}: {}", rpc_url, e)))?;

        // Create a provider for the Ethereum network at the specified URL
        let provider = ProviderBuilder::new().network::<Ethereum>().on_http(parsed);

        Ok(Self {
            provider: Arc::new(provider),
            url: rpc_url.to_string(),
        })
    }

    /// Endpoint URL this client talks to
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Verify the endpoint is reachable by fetching the latest block number
    ///
    /// # Returns
    ///
    /// * `Result<u64, ProviderError>` - The latest block number or an error
    pub async fn check_connection(&self) -> Result<u64, ProviderError> {
        let block_number = self
            .provider
            .get_block_number()
            .await
            .map_err(map_transport_error)?;
        debug!("Connected to {}, latest block number: {}", self.url, block_number);
        Ok(block_number)
    }

    /// Forward a raw JSON-RPC request to the upstream node
    ///
    /// The method name and parameters are passed through verbatim and the raw
    /// result value is returned. Upstream JSON-RPC errors are preserved with
    /// their original code and message.
    ///
    /// # Arguments
    ///
    /// * `method` - JSON-RPC method name
    /// * `params` - Positional JSON-RPC parameters
    ///
    /// # Returns
    ///
    /// * `Result<Value, ProviderError>` - The raw JSON result or an error
    pub async fn raw_request(&self, method: &str, params: &[Value]) -> Result<Value, ProviderError> {
        debug!("Forwarding {} to {}", method, self.url);
        self.provider
            .client()
            .request::<Vec<Value>, Value>(method.to_string(), params.to_vec())
            .await
            .map_err(map_transport_error)
    }
}

/// Translate an Alloy transport error into a pipeline error
///
/// JSON-RPC error responses from the upstream node keep their code, message and
/// data; transport-level failures become connection errors.
fn map_transport_error(err: TransportError) -> ProviderError {
    match err {
        RpcError::ErrorResp(payload) => {
            let data = payload
                .data
                .as_deref()
                .and_then(|raw| serde_json::from_str(raw.get()).ok());
            ProviderError::Rpc(JsonRpcErrorDetail {
                code: i32::try_from(payload.code).unwrap_or(-32603),
                message: payload.message.to_string(),
                data,
            })
        }
        other => ProviderError::RpcConnection(other.to_string()),
    }
}
