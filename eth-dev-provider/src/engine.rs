use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::ProviderError;
use crate::subproviders::{Outcome, Subprovider};

/// Provider engine dispatching JSON-RPC requests through a subprovider stack
///
/// Subproviders are consulted in the order they were added; the first one that
/// handles a method produces the response. The engine must be started before it
/// serves requests, which gives every subprovider a chance to run its start
/// hook (connectivity checks, genesis sealing, interval miner).
pub struct ProviderEngine {
    /// Ordered middleware stack
    subproviders: Vec<Box<dyn Subprovider>>,

    /// Set once start() has completed
    started: AtomicBool,
}

impl ProviderEngine {
    /// Create an empty engine with no subproviders
    pub fn new() -> Self {
        Self {
            subproviders: Vec::new(),
            started: AtomicBool::new(false),
        }
    }

    /// Append a subprovider to the bottom of the stack
    pub fn add_subprovider(&mut self, subprovider: Box<dyn Subprovider>) {
        debug!("Adding subprovider {}", subprovider.name());
        self.subproviders.push(subprovider);
    }

    /// Names of the stacked subproviders, top to bottom
    pub fn subprovider_names(&self) -> Vec<&'static str> {
        self.subproviders.iter().map(|s| s.name()).collect()
    }

    /// Whether start() has completed
    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    /// Start the engine
    ///
    /// Runs every subprovider's start hook in stack order, then marks the
    /// engine as ready. A hook failure leaves the engine stopped.
    pub async fn start(&self) -> Result<(), ProviderError> {
        for subprovider in &self.subproviders {
            debug!("Starting subprovider {}", subprovider.name());
            subprovider.start().await?;
        }
        self.started.store(true, Ordering::SeqCst);
        Ok(())
    }

    /// Dispatch a JSON-RPC request through the stack
    ///
    /// # Arguments
    ///
    /// * `method` - JSON-RPC method name
    /// * `params` - Positional JSON-RPC parameters
    ///
    /// # Returns
    ///
    /// * `Result<Value, ProviderError>` - The first handler's result, an error
    ///   from a handler, or a method-not-found error when nothing handled it
    #[instrument(skip(self, params), err)]
    pub async fn request(&self, method: &str, params: &[Value]) -> Result<Value, ProviderError> {
        if !self.is_started() {
            return Err(ProviderError::EngineNotStarted);
        }

        for subprovider in &self.subproviders {
            match subprovider.handle(method, params).await? {
                Outcome::Handled(result) => {
                    debug!("{} handled by {}", method, subprovider.name());
                    return Ok(result);
                }
                Outcome::NotHandled => continue,
            }
        }

        Err(ProviderError::rpc(
            -32601,
            format!("Method {} not handled by any subprovider", method),
        ))
    }
}

impl Default for ProviderEngine {
    fn default() -> Self {
        Self::new()
    }
}
