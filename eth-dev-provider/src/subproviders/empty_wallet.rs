use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::ProviderError;
use crate::subproviders::{Outcome, Subprovider};

/// Subprovider simulating a wallet that exposes no addresses
///
/// Intercepts `eth_accounts` and answers with an empty list, shadowing any
/// account source further down the stack. Useful for exercising code paths
/// that must cope with a provider without unlocked accounts.
#[derive(Debug, Default)]
pub struct EmptyWalletSubprovider;

#[async_trait]
impl Subprovider for EmptyWalletSubprovider {
    fn name(&self) -> &'static str {
        "empty-wallet"
    }

    async fn handle(&self, method: &str, _params: &[Value]) -> Result<Outcome, ProviderError> {
        match method {
            "eth_accounts" => Ok(Outcome::Handled(json!([]))),
            _ => Ok(Outcome::NotHandled),
        }
    }
}
