use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::ProviderError;
use crate::models::jsonrpc::format_hex_u64;
use crate::subproviders::{Outcome, Subprovider};

/// Subprovider short-circuiting gas estimation with a fixed value
///
/// Answers every `eth_estimateGas` with the configured gas amount instead of
/// estimating. Development chains accept over-provisioned gas, and skipping
/// estimation keeps test runs fast and deterministic.
#[derive(Debug)]
pub struct FakeGasEstimateSubprovider {
    /// Gas value returned for every estimation request
    gas: u64,
}

impl FakeGasEstimateSubprovider {
    /// Create a fake estimator that always reports `gas`
    pub fn new(gas: u64) -> Self {
        Self { gas }
    }
}

#[async_trait]
impl Subprovider for FakeGasEstimateSubprovider {
    fn name(&self) -> &'static str {
        "fake-gas-estimate"
    }

    async fn handle(&self, method: &str, _params: &[Value]) -> Result<Outcome, ProviderError> {
        match method {
            "eth_estimateGas" => {
                debug!("Faking gas estimate: {}", self.gas);
                Ok(Outcome::Handled(json!(format_hex_u64(self.gas))))
            }
            _ => Ok(Outcome::NotHandled),
        }
    }
}
