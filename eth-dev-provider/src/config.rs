use alloy::primitives::Address;
use eyre::Result;
use std::env;
use std::path::PathBuf;

use crate::models::jsonrpc::parse_hex_address;

/// Default RPC endpoint used when no remote URL is configured
pub const DEFAULT_RPC_URL: &str = "http://localhost:8545";

/// Block gas limit for the development chain, also used by the fake gas estimator
pub const GAS_LIMIT: u64 = 9_000_000;

/// Network id reported by the development chain
pub const NETWORK_ID: u64 = 50;

/// Mnemonic seeding the deterministic development accounts
pub const MNEMONIC: &str =
    "concert load couple harbor equip island argue ramp clarify fence smart topic";

/// Number of accounts derived when none is configured
pub const DEFAULT_TOTAL_ACCOUNTS: u64 = 10;

/// Initial balance of each development account, in ether
pub const DEFAULT_BALANCE_ETH: u64 = 100;

/// Gas unit constants
pub const GWEI: u128 = 1_000_000_000;

/// Fixed gas price reported by the development chain (10 gwei)
pub const DEFAULT_GAS_PRICE: u128 = 10 * GWEI;

/// File the development chain appends its event log to
pub const CHAIN_LOG_FILE: &str = "devchain.log";

/// Environment variable toggling verbose development chain logging
pub const VERBOSE_DEVCHAIN_ENV: &str = "VERBOSE_DEVCHAIN";

/// Options record for the provider pipeline factory
///
/// Every field is optional; unset fields fall back to the documented defaults
/// through the resolver methods below. At most one of the in-process chain and
/// an explicit remote RPC URL may be active.
#[derive(Debug, Clone, Default)]
pub struct ProviderConfig {
    /// Number of development accounts to derive (default: 10)
    pub total_accounts: Option<u64>,

    /// Whether the provider exposes any addresses (default: true)
    pub has_addresses: Option<bool>,

    /// Run the in-process development chain instead of forwarding (default: false)
    pub use_in_process_chain: Option<bool>,

    /// Surface failed transactions as JSON-RPC errors (default: true)
    pub vm_errors_on_rpc_response: Option<bool>,

    /// Remote RPC endpoint URL (default: unset, http://localhost:8545 when forwarding)
    pub rpc_url: Option<String>,

    /// Short-circuit eth_estimateGas with a fixed value (default: true)
    pub fake_gas_estimate: Option<bool>,

    /// Directory for chain state persistence (default: unset, no persistence)
    pub database_path: Option<PathBuf>,

    /// Skip the EIP-170 contract size check (default: false)
    pub allow_unlimited_contract_size: Option<bool>,

    /// Remote endpoint the development chain falls back to for unknown state (default: unset)
    pub fork_url: Option<String>,

    /// Interval mining period in seconds (default: unset, instamine)
    pub block_time_secs: Option<u64>,

    /// Additional addresses allowed to send transactions (default: empty)
    pub unlocked_accounts: Vec<Address>,
}

impl ProviderConfig {
    /// Resolved number of development accounts
    pub fn total_accounts(&self) -> u64 {
        self.total_accounts.unwrap_or(DEFAULT_TOTAL_ACCOUNTS)
    }

    /// Resolved address visibility flag
    pub fn has_addresses(&self) -> bool {
        self.has_addresses.unwrap_or(true)
    }

    /// Resolved in-process chain flag
    pub fn use_in_process_chain(&self) -> bool {
        self.use_in_process_chain.unwrap_or(false)
    }

    /// Resolved VM error reporting flag
    pub fn vm_errors_on_rpc_response(&self) -> bool {
        self.vm_errors_on_rpc_response.unwrap_or(true)
    }

    /// Resolved fake gas estimation flag
    pub fn fake_gas_estimate(&self) -> bool {
        self.fake_gas_estimate.unwrap_or(true)
    }

    /// Resolved contract size check flag
    pub fn allow_unlimited_contract_size(&self) -> bool {
        self.allow_unlimited_contract_size.unwrap_or(false)
    }
}

/// Service configuration structure
///
/// This structure contains all the configuration parameters for the development
/// provider service. It handles loading values from environment variables with
/// appropriate defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Host address to bind the server to (default: 127.0.0.1)
    pub host: String,

    /// Port to listen on (default: 8545)
    pub port: u16,

    /// Provider pipeline options assembled from the environment
    pub provider: ProviderConfig,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// This method reads configuration from environment variables,
    /// using default values when variables are not defined.
    ///
    /// # Returns
    ///
    /// * `Result<Self>` - Configuration structure or error
    ///
    /// # Environment Variables
    ///
    /// * `HOST` - Server host address (default: "127.0.0.1")
    /// * `PORT` - Server port (default: 8545)
    /// * `USE_IN_PROCESS_CHAIN` - Run the in-process development chain (default: false)
    /// * `RPC_URL` - Remote RPC endpoint to forward to (default: unset)
    /// * `FORK_URL` - Fork endpoint for the development chain (default: unset)
    /// * `DATABASE_PATH` - Chain state persistence directory (default: unset)
    /// * `BLOCK_TIME_SECS` - Interval mining period in seconds (default: unset)
    /// * `TOTAL_ACCOUNTS` - Number of development accounts (default: 10)
    /// * `UNLOCKED_ACCOUNTS` - Comma-separated extra sender addresses (default: empty)
    /// * `HAS_ADDRESSES` - Whether the provider exposes any addresses (default: true)
    /// * `FAKE_GAS_ESTIMATE` - Short-circuit eth_estimateGas (default: true)
    /// * `VM_ERRORS_ON_RPC_RESPONSE` - Surface failed transactions as errors (default: true)
    /// * `ALLOW_UNLIMITED_CONTRACT_SIZE` - Skip the EIP-170 size check (default: false)
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists (useful for development)
        let _ = dotenv::dotenv();

        let unlocked_accounts = match env::var("UNLOCKED_ACCOUNTS") {
            Ok(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| parse_hex_address(s).map_err(|e| eyre::eyre!(e)))
                .collect::<Result<Vec<Address>>>()?,
            Err(_) => Vec::new(),
        };

        let provider = ProviderConfig {
            total_accounts: env::var("TOTAL_ACCOUNTS")
                .ok()
                .map(|v| v.parse::<u64>())
                .transpose()?,
            use_in_process_chain: env::var("USE_IN_PROCESS_CHAIN")
                .ok()
                .map(|v| parse_boolean(&v)),
            has_addresses: env::var("HAS_ADDRESSES").ok().map(|v| parse_boolean(&v)),
            fake_gas_estimate: env::var("FAKE_GAS_ESTIMATE")
                .ok()
                .map(|v| parse_boolean(&v)),
            vm_errors_on_rpc_response: env::var("VM_ERRORS_ON_RPC_RESPONSE")
                .ok()
                .map(|v| parse_boolean(&v)),
            allow_unlimited_contract_size: env::var("ALLOW_UNLIMITED_CONTRACT_SIZE")
                .ok()
                .map(|v| parse_boolean(&v)),
            rpc_url: env::var("RPC_URL").ok(),
            fork_url: env::var("FORK_URL").ok(),
            database_path: env::var("DATABASE_PATH").ok().map(PathBuf::from),
            block_time_secs: env::var("BLOCK_TIME_SECS")
                .ok()
                .map(|v| v.parse::<u64>())
                .transpose()?,
            unlocked_accounts,
        };

        // Create configuration with values from environment or defaults
        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8545".to_string())
                .parse::<u16>()?,
            provider,
        })
    }
}

/// Parse a boolean environment variable value
///
/// Accepts "true"/"false" in any case as well as "1"/"0".
pub fn parse_boolean(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "1")
}

/// Read a boolean environment variable, defaulting to false when unset
pub fn env_boolean(name: &str) -> bool {
    env::var(name).map(|v| parse_boolean(&v)).unwrap_or(false)
}
