use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use alloy::primitives::{keccak256, Address, Bytes, B256, U256};
use alloy::signers::local::PrivateKeySigner;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::{
    CHAIN_LOG_FILE, DEFAULT_BALANCE_ETH, DEFAULT_GAS_PRICE, DEFAULT_TOTAL_ACCOUNTS, GAS_LIMIT,
    MNEMONIC, NETWORK_ID,
};
use crate::error::ProviderError;
use crate::models::jsonrpc::{
    format_hex_bytes, format_hex_u256, format_hex_u64, parse_hex_address, parse_hex_bytes,
    parse_hex_u256, parse_hex_u64, TransactionParams,
};
use crate::rpc::RpcClient;
use crate::subproviders::{Outcome, Subprovider};

/// EIP-170 deployed code size cap, enforced unless unlimited size is allowed
const MAX_CODE_SIZE: usize = 24_576;

/// Base transaction cost in gas
const TX_BASE_GAS: u64 = 21_000;

/// Additional gas charged for contract creation
const TX_CREATE_GAS: u64 = 32_000;

/// Gas charged per byte of calldata
const TX_DATA_GAS: u64 = 16;

/// File name of the persisted chain state inside the database directory
const STATE_FILE: &str = "chain.json";

/// Configuration for the in-process development chain
#[derive(Debug, Clone)]
pub struct DevChainConfig {
    /// Number of accounts derived from the mnemonic
    pub total_accounts: u64,

    /// Network id reported via eth_chainId and net_version
    pub network_id: u64,

    /// Block gas limit
    pub gas_limit: u64,

    /// Mnemonic seeding the deterministic accounts
    pub mnemonic: String,

    /// Surface failed transactions as JSON-RPC errors instead of status-0 receipts
    pub vm_errors_on_rpc_response: bool,

    /// Skip the EIP-170 contract size check
    pub allow_unlimited_contract_size: bool,

    /// Directory the chain state is persisted under, if any
    pub database_path: Option<PathBuf>,

    /// Remote endpoint consulted for state the chain does not know locally
    pub fork_url: Option<String>,

    /// Interval mining period; unset means one block per transaction
    pub block_time_secs: Option<u64>,

    /// Additional addresses allowed to send transactions
    pub unlocked_accounts: Vec<Address>,

    /// File the chain appends its event log to
    pub log_path: PathBuf,

    /// Log chain events at info level instead of debug
    pub verbose: bool,
}

impl Default for DevChainConfig {
    fn default() -> Self {
        Self {
            total_accounts: DEFAULT_TOTAL_ACCOUNTS,
            network_id: NETWORK_ID,
            gas_limit: GAS_LIMIT,
            mnemonic: MNEMONIC.to_string(),
            vm_errors_on_rpc_response: true,
            allow_unlimited_contract_size: false,
            database_path: None,
            fork_url: None,
            block_time_secs: None,
            unlocked_accounts: Vec::new(),
            log_path: PathBuf::from(CHAIN_LOG_FILE),
            verbose: false,
        }
    }
}

/// A sealed block of the development chain
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BlockRecord {
    number: u64,
    hash: B256,
    parent_hash: B256,
    timestamp: u64,
    gas_limit: u64,
    gas_used: u64,
    transactions: Vec<B256>,
}

/// An accepted transaction, pending until its block is sealed
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TxRecord {
    hash: B256,
    from: Address,
    to: Option<Address>,
    value: U256,
    input: Bytes,
    nonce: u64,
    gas: u64,
    gas_used: u64,
    gas_price: u128,
    status: bool,
    contract_address: Option<Address>,
    block_number: Option<u64>,
    block_hash: Option<B256>,
    transaction_index: Option<u64>,
}

/// Complete chain state, serialized as-is to the database file
#[derive(Debug, Default, Serialize, Deserialize)]
struct ChainState {
    blocks: Vec<BlockRecord>,
    balances: HashMap<Address, U256>,
    nonces: HashMap<Address, u64>,
    code: HashMap<Address, Bytes>,
    transactions: HashMap<B256, TxRecord>,
    receipts: HashMap<B256, Value>,
    pending: Vec<B256>,
}

impl ChainState {
    /// Fresh state with every development account funded
    fn genesis(accounts: &[Address]) -> Self {
        let initial_balance = U256::from(DEFAULT_BALANCE_ETH) * U256::from(10u64).pow(U256::from(18));
        let balances = accounts
            .iter()
            .map(|account| (*account, initial_balance))
            .collect();
        Self {
            balances,
            ..Self::default()
        }
    }

    /// Number of the most recently sealed block
    fn latest_block_number(&self) -> u64 {
        self.blocks.last().map(|b| b.number).unwrap_or(0)
    }
}

/// In-process development chain subprovider
///
/// A minimal stand-in for a local test node: deterministic funded accounts,
/// lightweight blocks, value transfers and receipts, optional state
/// persistence and optional fork fallback. There is no EVM; contract creation
/// records the payload as the account code and calls return empty data (or are
/// forwarded to the fork endpoint when one is configured).
pub struct DevChainSubprovider {
    config: DevChainConfig,
    accounts: Vec<Address>,
    state: Arc<Mutex<ChainState>>,
    fork: Option<RpcClient>,
    miner: Mutex<Option<JoinHandle<()>>>,
}

impl DevChainSubprovider {
    /// Create a development chain from the given configuration
    ///
    /// When a database directory holds a previously persisted state file, that
    /// state is reloaded; otherwise a fresh funded genesis state is built. The
    /// genesis block itself is sealed by the engine start hook.
    pub fn new(config: DevChainConfig) -> Result<Self, ProviderError> {
        let accounts = derive_accounts(&config.mnemonic, config.total_accounts)?;

        let state = match state_file(config.database_path.as_deref()) {
            Some(path) if path.exists() => {
                info!("Reloading chain state from {}", path.display());
                let raw = fs::read_to_string(&path)?;
                serde_json::from_str(&raw)?
            }
            _ => ChainState::genesis(&accounts),
        };

        let fork = config
            .fork_url
            .as_deref()
            .map(RpcClient::new)
            .transpose()?;

        Ok(Self {
            config,
            accounts,
            state: Arc::new(Mutex::new(state)),
            fork,
            miner: Mutex::new(None),
        })
    }

    /// Whether the address may send transactions through this chain
    fn is_known_sender(&self, address: &Address) -> bool {
        self.accounts.contains(address) || self.config.unlocked_accounts.contains(address)
    }

    /// Append a line to the chain log file and emit it as a tracing event
    fn chain_log(&self, line: &str) {
        if let Err(e) = append_log(&self.config.log_path, line) {
            warn!("Failed to append to chain log: {}", e);
        }
        if self.config.verbose {
            info!("{}", line);
        } else {
            debug!("{}", line);
        }
    }

    /// Persist the chain state to the database directory, when configured
    fn persist(&self, state: &ChainState) -> Result<(), ProviderError> {
        persist_state(self.config.database_path.as_deref(), state)
    }

    /// Answer from local state, fall back to the fork endpoint, or default
    async fn forward_or(
        &self,
        method: &str,
        params: &[Value],
        default: Value,
    ) -> Result<Outcome, ProviderError> {
        match &self.fork {
            Some(fork) => fork.raw_request(method, params).await.map(Outcome::Handled),
            None => Ok(Outcome::Handled(default)),
        }
    }

    async fn get_balance(&self, params: &[Value]) -> Result<Outcome, ProviderError> {
        let address = param_address(params, 0)?;
        {
            let state = self.state.lock().await;
            if let Some(balance) = state.balances.get(&address) {
                return Ok(Outcome::Handled(json!(format_hex_u256(*balance))));
            }
        }
        self.forward_or("eth_getBalance", params, json!("0x0")).await
    }

    async fn get_transaction_count(&self, params: &[Value]) -> Result<Outcome, ProviderError> {
        let address = param_address(params, 0)?;
        {
            let state = self.state.lock().await;
            if let Some(nonce) = state.nonces.get(&address) {
                return Ok(Outcome::Handled(json!(format_hex_u64(*nonce))));
            }
            // Known accounts start at nonce zero without a map entry
            if self.is_known_sender(&address) {
                return Ok(Outcome::Handled(json!("0x0")));
            }
        }
        self.forward_or("eth_getTransactionCount", params, json!("0x0"))
            .await
    }

    async fn get_code(&self, params: &[Value]) -> Result<Outcome, ProviderError> {
        let address = param_address(params, 0)?;
        {
            let state = self.state.lock().await;
            if let Some(code) = state.code.get(&address) {
                return Ok(Outcome::Handled(json!(format_hex_bytes(code))));
            }
        }
        self.forward_or("eth_getCode", params, json!("0x")).await
    }

    async fn get_block_by_number(&self, params: &[Value]) -> Result<Outcome, ProviderError> {
        let tag = params
            .first()
            .and_then(Value::as_str)
            .unwrap_or("latest");
        let full = params.get(1).and_then(Value::as_bool).unwrap_or(false);

        let state = self.state.lock().await;
        let block = match tag {
            "latest" | "pending" => state.blocks.last(),
            "earliest" => state.blocks.first(),
            hex => {
                let number = parse_hex_u64(hex).map_err(|e| ProviderError::rpc(-32602, e))?;
                state.blocks.iter().find(|b| b.number == number)
            }
        };

        let result = match block {
            Some(block) => block_to_json(block, &state, full),
            None => Value::Null,
        };
        Ok(Outcome::Handled(result))
    }

    async fn get_transaction_by_hash(&self, params: &[Value]) -> Result<Outcome, ProviderError> {
        let hash = param_b256(params, 0)?;
        {
            let state = self.state.lock().await;
            if let Some(tx) = state.transactions.get(&hash) {
                return Ok(Outcome::Handled(tx_to_json(tx)));
            }
        }
        self.forward_or("eth_getTransactionByHash", params, Value::Null)
            .await
    }

    async fn get_transaction_receipt(&self, params: &[Value]) -> Result<Outcome, ProviderError> {
        let hash = param_b256(params, 0)?;
        {
            let state = self.state.lock().await;
            if let Some(receipt) = state.receipts.get(&hash) {
                return Ok(Outcome::Handled(receipt.clone()));
            }
        }
        self.forward_or("eth_getTransactionReceipt", params, Value::Null)
            .await
    }

    /// Intrinsic-cost estimate used when the fake gas middleware is disabled
    fn estimate_gas(&self, params: &[Value]) -> Result<Outcome, ProviderError> {
        let tx = parse_transaction_params(params)?;
        let input = match &tx.input {
            Some(raw) => parse_hex_bytes(raw).map_err(|e| ProviderError::rpc(-32602, e))?,
            None => Bytes::new(),
        };
        let creation = tx.to.is_none();
        Ok(Outcome::Handled(json!(format_hex_u64(intrinsic_gas(
            creation, &input
        )))))
    }

    /// Accept a transaction: validate, apply the transfer, queue or instamine
    async fn send_transaction(&self, params: &[Value]) -> Result<Outcome, ProviderError> {
        let tx = parse_transaction_params(params)?;

        let from = match &tx.from {
            Some(raw) => parse_hex_address(raw).map_err(|e| ProviderError::rpc(-32602, e))?,
            None => return Err(ProviderError::rpc(-32602, "Missing 'from' address")),
        };
        if !self.is_known_sender(&from) {
            return Err(ProviderError::rpc(-32000, "sender account not recognized"));
        }

        let to = match &tx.to {
            Some(raw) => Some(parse_hex_address(raw).map_err(|e| ProviderError::rpc(-32602, e))?),
            None => None,
        };
        let value = match &tx.value {
            Some(raw) => parse_hex_u256(raw).map_err(|e| ProviderError::rpc(-32602, e))?,
            None => U256::ZERO,
        };
        let input = match &tx.input {
            Some(raw) => parse_hex_bytes(raw).map_err(|e| ProviderError::rpc(-32602, e))?,
            None => Bytes::new(),
        };
        let gas_used = intrinsic_gas(to.is_none(), &input);
        let gas = match &tx.gas {
            Some(raw) => parse_hex_u64(raw).map_err(|e| ProviderError::rpc(-32602, e))?,
            None => gas_used,
        };
        let gas_price = match tx.gas_price.as_deref().or(tx.max_fee_per_gas.as_deref()) {
            Some(raw) => {
                let price = parse_hex_u256(raw).map_err(|e| ProviderError::rpc(-32602, e))?;
                u128::try_from(price)
                    .map_err(|_| ProviderError::rpc(-32602, "Gas price exceeds u128"))?
            }
            None => DEFAULT_GAS_PRICE,
        };

        let mut state = self.state.lock().await;
        let nonce = state.nonces.get(&from).copied().unwrap_or(0);
        if let Some(raw) = &tx.nonce {
            let requested = parse_hex_u64(raw).map_err(|e| ProviderError::rpc(-32602, e))?;
            if requested != nonce {
                return Err(ProviderError::rpc(
                    -32000,
                    format!(
                        "the tx doesn't have the correct nonce. account has nonce of: {} tx has nonce of: {}",
                        nonce, requested
                    ),
                ));
            }
        }
        let balance = state.balances.get(&from).copied().unwrap_or(U256::ZERO);
        let cost = value + U256::from(gas_used) * U256::from(gas_price);

        // Execution-level failures respect the VM error reporting flag
        let mut failure: Option<String> = None;
        if to.is_none() && input.len() > MAX_CODE_SIZE && !self.config.allow_unlimited_contract_size
        {
            failure = Some(format!("contract code size exceeds {} bytes", MAX_CODE_SIZE));
        } else if balance < cost {
            failure = Some(format!(
                "sender doesn't have enough funds to send tx: balance {}, cost {}",
                balance, cost
            ));
        }

        if let Some(reason) = &failure {
            if self.config.vm_errors_on_rpc_response {
                return Err(ProviderError::rpc(
                    -32000,
                    format!("VM Exception while processing transaction: {}", reason),
                ));
            }
        }

        let hash = transaction_hash(&from, to.as_ref(), nonce, value, &input);
        let mut contract_address = None;

        if failure.is_none() {
            state.balances.insert(from, balance - cost);
            if let Some(to) = to {
                let recipient = state.balances.get(&to).copied().unwrap_or(U256::ZERO);
                state.balances.insert(to, recipient + value);
            } else {
                let created = from.create(nonce);
                state.code.insert(created, input.clone());
                contract_address = Some(created);
            }
        }
        // The nonce is consumed whether or not execution succeeded
        state.nonces.insert(from, nonce + 1);

        let record = TxRecord {
            hash,
            from,
            to,
            value,
            input,
            nonce,
            gas,
            gas_used,
            gas_price,
            status: failure.is_none(),
            contract_address,
            block_number: None,
            block_hash: None,
            transaction_index: None,
        };
        state.transactions.insert(hash, record);
        state.pending.push(hash);

        if self.config.block_time_secs.is_none() {
            let block = seal_block(&mut state, self.config.gas_limit);
            self.persist(&state)?;
            self.chain_log(&format!(
                "Transaction {} from {} mined in block {}",
                hash, from, block.number
            ));
        } else {
            self.chain_log(&format!("Transaction {} from {} queued", hash, from));
        }

        Ok(Outcome::Handled(json!(hash)))
    }

    /// Seal a block on demand (evm_mine)
    async fn mine(&self) -> Result<Outcome, ProviderError> {
        let mut state = self.state.lock().await;
        let block = seal_block(&mut state, self.config.gas_limit);
        self.persist(&state)?;
        self.chain_log(&format!(
            "Block {} sealed with {} transactions",
            block.number,
            block.transactions.len()
        ));
        Ok(Outcome::Handled(json!("0x0")))
    }
}

#[async_trait]
impl Subprovider for DevChainSubprovider {
    fn name(&self) -> &'static str {
        "dev-chain"
    }

    async fn handle(&self, method: &str, params: &[Value]) -> Result<Outcome, ProviderError> {
        match method {
            "eth_accounts" => Ok(Outcome::Handled(json!(self.accounts))),
            "eth_chainId" => Ok(Outcome::Handled(json!(format_hex_u64(
                self.config.network_id
            )))),
            "net_version" => Ok(Outcome::Handled(json!(self.config.network_id.to_string()))),
            "web3_clientVersion" => Ok(Outcome::Handled(json!(format!(
                "EthDevProvider/v{}",
                env!("CARGO_PKG_VERSION")
            )))),
            "eth_gasPrice" => Ok(Outcome::Handled(json!(format!("0x{:x}", DEFAULT_GAS_PRICE)))),
            "eth_blockNumber" => {
                let state = self.state.lock().await;
                Ok(Outcome::Handled(json!(format_hex_u64(
                    state.latest_block_number()
                ))))
            }
            "eth_getBalance" => self.get_balance(params).await,
            "eth_getTransactionCount" => self.get_transaction_count(params).await,
            "eth_getCode" => self.get_code(params).await,
            "eth_getBlockByNumber" => self.get_block_by_number(params).await,
            "eth_getTransactionByHash" => self.get_transaction_by_hash(params).await,
            "eth_getTransactionReceipt" => self.get_transaction_receipt(params).await,
            "eth_estimateGas" => self.estimate_gas(params),
            "eth_sendTransaction" => self.send_transaction(params).await,
            "eth_call" => self.forward_or("eth_call", params, json!("0x")).await,
            "evm_mine" => self.mine().await,
            _ => match &self.fork {
                Some(fork) => fork.raw_request(method, params).await.map(Outcome::Handled),
                None => Ok(Outcome::NotHandled),
            },
        }
    }

    /// Seal the genesis block on fresh state and spawn the interval miner
    async fn start(&self) -> Result<(), ProviderError> {
        if let Some(fork) = &self.fork {
            let block_number = fork.check_connection().await?;
            info!("Forking from {} at block {}", fork.url(), block_number);
        }

        {
            let mut state = self.state.lock().await;
            if state.blocks.is_empty() {
                let block = seal_block(&mut state, self.config.gas_limit);
                self.persist(&state)?;
                self.chain_log(&format!("Genesis block sealed: {}", block.hash));
            }
        }

        if let Some(secs) = self.config.block_time_secs {
            let state = Arc::clone(&self.state);
            let gas_limit = self.config.gas_limit;
            let database_path = self.config.database_path.clone();
            let log_path = self.config.log_path.clone();
            let verbose = self.config.verbose;

            let handle = tokio::spawn(async move {
                loop {
                    tokio::time::sleep(Duration::from_secs(secs)).await;
                    let mut state = state.lock().await;
                    let block = seal_block(&mut state, gas_limit);
                    if let Err(e) = persist_state(database_path.as_deref(), &state) {
                        warn!("Failed to persist chain state: {}", e);
                    }
                    let line = format!(
                        "Block {} sealed with {} transactions",
                        block.number,
                        block.transactions.len()
                    );
                    if let Err(e) = append_log(&log_path, &line) {
                        warn!("Failed to append to chain log: {}", e);
                    }
                    if verbose {
                        info!("{}", line);
                    } else {
                        debug!("{}", line);
                    }
                }
            });
            *self.miner.lock().await = Some(handle);
        }

        Ok(())
    }
}

impl Drop for DevChainSubprovider {
    fn drop(&mut self) {
        if let Some(handle) = self.miner.get_mut().take() {
            handle.abort();
        }
    }
}

/// Derive deterministic development accounts from a mnemonic
///
/// Private keys are the keccak hash of the mnemonic and the account index.
/// This is not BIP-44 derivation; the accounts exist only for local use.
fn derive_accounts(mnemonic: &str, count: u64) -> Result<Vec<Address>, ProviderError> {
    let mut accounts = Vec::with_capacity(count as usize);
    for index in 0..count {
        let seed = keccak256(format!("{}/{}", mnemonic, index).as_bytes());
        let signer = PrivateKeySigner::from_bytes(&seed)
            .map_err(|e| ProviderError::AccountDerivation(format!("account {}: {}", index, e)))?;
        accounts.push(signer.address());
    }
    Ok(accounts)
}

/// Deterministic transaction hash over the fields the chain tracks
fn transaction_hash(
    from: &Address,
    to: Option<&Address>,
    nonce: u64,
    value: U256,
    input: &[u8],
) -> B256 {
    let mut preimage = Vec::with_capacity(92 + input.len());
    preimage.extend_from_slice(from.as_slice());
    if let Some(to) = to {
        preimage.extend_from_slice(to.as_slice());
    }
    preimage.extend_from_slice(&nonce.to_be_bytes());
    preimage.extend_from_slice(&value.to_be_bytes::<32>());
    preimage.extend_from_slice(input);
    keccak256(&preimage)
}

/// Intrinsic transaction cost: base fee, creation surcharge, calldata
fn intrinsic_gas(creation: bool, input: &[u8]) -> u64 {
    let mut gas = TX_BASE_GAS + input.len() as u64 * TX_DATA_GAS;
    if creation {
        gas += TX_CREATE_GAS;
    }
    gas
}

/// Seal the pending transactions into a new block and build their receipts
fn seal_block(state: &mut ChainState, gas_limit: u64) -> BlockRecord {
    let number = match state.blocks.last() {
        Some(block) => block.number + 1,
        None => 0,
    };
    let parent_hash = state.blocks.last().map(|b| b.hash).unwrap_or(B256::ZERO);
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let included: Vec<B256> = state.pending.drain(..).collect();

    let mut preimage = Vec::with_capacity(48 + included.len() * 32);
    preimage.extend_from_slice(&number.to_be_bytes());
    preimage.extend_from_slice(parent_hash.as_slice());
    preimage.extend_from_slice(&timestamp.to_be_bytes());
    for tx_hash in &included {
        preimage.extend_from_slice(tx_hash.as_slice());
    }
    let hash = keccak256(&preimage);

    let mut gas_used = 0u64;
    for (index, tx_hash) in included.iter().enumerate() {
        if let Some(tx) = state.transactions.get_mut(tx_hash) {
            tx.block_number = Some(number);
            tx.block_hash = Some(hash);
            tx.transaction_index = Some(index as u64);
            gas_used += tx.gas_used;

            let receipt = json!({
                "transactionHash": tx.hash,
                "transactionIndex": format_hex_u64(index as u64),
                "blockNumber": format_hex_u64(number),
                "blockHash": hash,
                "from": tx.from,
                "to": tx.to,
                "contractAddress": tx.contract_address,
                "gasUsed": format_hex_u64(tx.gas_used),
                "cumulativeGasUsed": format_hex_u64(gas_used),
                "status": if tx.status { "0x1" } else { "0x0" },
                "logs": [],
            });
            state.receipts.insert(*tx_hash, receipt);
        }
    }

    let block = BlockRecord {
        number,
        hash,
        parent_hash,
        timestamp,
        gas_limit,
        gas_used,
        transactions: included,
    };
    state.blocks.push(block.clone());
    block
}

/// Render a block as an eth_getBlockByNumber result
fn block_to_json(block: &BlockRecord, state: &ChainState, full: bool) -> Value {
    let transactions: Vec<Value> = if full {
        block
            .transactions
            .iter()
            .filter_map(|hash| state.transactions.get(hash))
            .map(tx_to_json)
            .collect()
    } else {
        block.transactions.iter().map(|hash| json!(hash)).collect()
    };

    json!({
        "number": format_hex_u64(block.number),
        "hash": block.hash,
        "parentHash": block.parent_hash,
        "timestamp": format_hex_u64(block.timestamp),
        "gasLimit": format_hex_u64(block.gas_limit),
        "gasUsed": format_hex_u64(block.gas_used),
        "miner": Address::ZERO,
        "difficulty": "0x0",
        "extraData": "0x",
        "transactions": transactions,
    })
}

/// Render a transaction as an eth_getTransactionByHash result
fn tx_to_json(tx: &TxRecord) -> Value {
    json!({
        "hash": tx.hash,
        "from": tx.from,
        "to": tx.to,
        "value": format_hex_u256(tx.value),
        "input": format_hex_bytes(&tx.input),
        "nonce": format_hex_u64(tx.nonce),
        "gas": format_hex_u64(tx.gas),
        "gasPrice": format!("0x{:x}", tx.gas_price),
        "blockNumber": tx.block_number.map(format_hex_u64),
        "blockHash": tx.block_hash,
        "transactionIndex": tx.transaction_index.map(format_hex_u64),
    })
}

/// Path of the state file inside the database directory, when persistence is on
fn state_file(database_path: Option<&Path>) -> Option<PathBuf> {
    database_path.map(|dir| dir.join(STATE_FILE))
}

/// Write the chain state to the database directory, when persistence is on
fn persist_state(database_path: Option<&Path>, state: &ChainState) -> Result<(), ProviderError> {
    if let Some(path) = state_file(database_path) {
        let raw = serde_json::to_string_pretty(state)?;
        fs::write(path, raw)?;
    }
    Ok(())
}

/// Append a line to the chain log file
fn append_log(path: &Path, line: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", line)
}

/// Extract a positional string parameter
fn param_str(params: &[Value], index: usize) -> Result<&str, ProviderError> {
    params
        .get(index)
        .and_then(Value::as_str)
        .ok_or_else(|| ProviderError::rpc(-32602, format!("Missing string parameter {}", index)))
}

/// Extract a positional address parameter
fn param_address(params: &[Value], index: usize) -> Result<Address, ProviderError> {
    parse_hex_address(param_str(params, index)?).map_err(|e| ProviderError::rpc(-32602, e))
}

/// Extract a positional 32-byte hash parameter
fn param_b256(params: &[Value], index: usize) -> Result<B256, ProviderError> {
    B256::from_str(param_str(params, index)?)
        .map_err(|e| ProviderError::rpc(-32602, format!("Invalid hash: {}", e)))
}

/// Extract the transaction object parameter
fn parse_transaction_params(params: &[Value]) -> Result<TransactionParams, ProviderError> {
    let raw = params
        .first()
        .ok_or_else(|| ProviderError::rpc(-32602, "Missing transaction parameters"))?;
    serde_json::from_value(raw.clone())
        .map_err(|e| ProviderError::rpc(-32602, format!("Invalid transaction parameters: {}", e)))
}
