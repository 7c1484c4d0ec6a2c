//! In-memory chain used by the integration tests
//!
//! `MockChain` answers the ERC20, ERC721 and Multicall3 selectors used by the
//! crate from a fixed state table, and can inject reverts, empty returns,
//! undecodable returns, aggregate failures and latency.

#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use alloy::{
    primitives::{Address, Bytes, U256},
    sol_types::SolValue,
};
use async_trait::async_trait;
use chain_lens::{
    errors::ConnectorError,
    traits::{ChainConnector, SharedConnector},
    types::{AggregateCall, BatchResult, SubCallResult, MULTICALL3_ADDRESS},
};

const BALANCE_OF: [u8; 4] = [0x70, 0xa0, 0x82, 0x31];
const DECIMALS: [u8; 4] = [0x31, 0x3c, 0xe5, 0x67];
const SYMBOL: [u8; 4] = [0x95, 0xd8, 0x9b, 0x41];
const GET_ETH_BALANCE: [u8; 4] = [0x4d, 0x23, 0x01, 0xcc];

pub const USDC: Address = Address::repeat_byte(0xa0);
pub const PUNKS: Address = Address::repeat_byte(0xb0);
pub const NATIVE_TOKEN: Address = Address::ZERO;

/// 10^18
pub const ONE_ETHER: u128 = 1_000_000_000_000_000_000;

/// Deterministic test wallet
pub fn wallet(n: u8) -> Address {
    let mut bytes = [0u8; 20];
    bytes[0] = 0xee;
    bytes[19] = n;
    Address::from(bytes)
}

pub fn wallets(n: u8) -> Vec<Address> {
    (1..=n).map(wallet).collect()
}

#[derive(Debug, Default, Clone)]
struct ContractState {
    decimals: Option<u8>,
    symbol: Option<String>,
    balances: HashMap<Address, U256>,
}

#[derive(Debug, Default)]
pub struct MockChain {
    erc20: HashMap<Address, ContractState>,
    erc721: HashMap<Address, ContractState>,
    native: HashMap<Address, U256>,
    native_unavailable: bool,
    /// Balance lookups that revert everywhere
    revert_owners: HashSet<Address>,
    /// Balance lookups that fail only inside an aggregate call
    batch_revert_owners: HashSet<Address>,
    /// Balance lookups that return no data inside an aggregate call
    empty_owners: HashSet<Address>,
    /// Balance lookups that return malformed data inside an aggregate call
    garbage_owners: HashSet<Address>,
    aggregate_failure: Option<ConnectorError>,
    aggregate_drop: usize,
    latency: Option<Duration>,

    pub aggregate_calls: AtomicUsize,
    pub probe_calls: AtomicUsize,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    single_queries: Mutex<Vec<Address>>,
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_erc20(mut self, token: Address, decimals: u8, symbol: &str) -> Self {
        let state = self.erc20.entry(token).or_default();
        state.decimals = Some(decimals);
        state.symbol = Some(symbol.to_string());
        self
    }

    /// ERC20 whose `symbol()` reverts
    pub fn with_erc20_no_symbol(mut self, token: Address, decimals: u8) -> Self {
        self.erc20.entry(token).or_default().decimals = Some(decimals);
        self
    }

    pub fn with_erc20_balance(mut self, token: Address, owner: Address, raw: u128) -> Self {
        self.erc20
            .entry(token)
            .or_default()
            .balances
            .insert(owner, U256::from(raw));
        self
    }

    pub fn with_erc721(mut self, token: Address, symbol: &str) -> Self {
        self.erc721.entry(token).or_default().symbol = Some(symbol.to_string());
        self
    }

    pub fn with_nft_count(mut self, token: Address, owner: Address, count: u64) -> Self {
        self.erc721
            .entry(token)
            .or_default()
            .balances
            .insert(owner, U256::from(count));
        self
    }

    pub fn with_native_balance(mut self, owner: Address, wei: u128) -> Self {
        self.native.insert(owner, U256::from(wei));
        self
    }

    pub fn with_native_unavailable(mut self) -> Self {
        self.native_unavailable = true;
        self
    }

    pub fn with_revert(mut self, owner: Address) -> Self {
        self.revert_owners.insert(owner);
        self
    }

    pub fn with_batch_revert(mut self, owner: Address) -> Self {
        self.batch_revert_owners.insert(owner);
        self
    }

    pub fn with_empty_return(mut self, owner: Address) -> Self {
        self.empty_owners.insert(owner);
        self
    }

    pub fn with_garbage_return(mut self, owner: Address) -> Self {
        self.garbage_owners.insert(owner);
        self
    }

    pub fn with_aggregate_failure(mut self, err: ConnectorError) -> Self {
        self.aggregate_failure = Some(err);
        self
    }

    /// Drop the last `n` results of every aggregate answer
    pub fn with_truncated_aggregate(mut self, n: usize) -> Self {
        self.aggregate_drop = n;
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn shared(self) -> (Arc<Self>, SharedConnector) {
        let chain = Arc::new(self);
        let connector: SharedConnector = chain.clone();
        (chain, connector)
    }

    /// Owners queried through single calls, in completion order
    pub fn single_queries(&self) -> Vec<Address> {
        self.single_queries.lock().unwrap().clone()
    }

    pub fn aggregate_count(&self) -> usize {
        self.aggregate_calls.load(Ordering::SeqCst)
    }

    pub fn peak_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn owner_arg(data: &[u8]) -> Option<Address> {
        (data.len() >= 36).then(|| Address::from_slice(&data[16..36]))
    }

    fn revert(reason: &str) -> ConnectorError {
        ConnectorError::Revert(reason.to_string())
    }

    fn native_of(&self, owner: Address) -> Result<U256, ConnectorError> {
        if self.native_unavailable {
            return Err(ConnectorError::Transport("eth_getBalance unsupported".into()));
        }
        if self.revert_owners.contains(&owner) {
            return Err(Self::revert("balance lookup failed"));
        }
        Ok(self.native.get(&owner).copied().unwrap_or_default())
    }

    /// Evaluate one read-only call against the state table
    fn eval(&self, target: Address, data: &[u8], in_batch: bool) -> Result<Bytes, ConnectorError> {
        if data.len() < 4 {
            return Err(Self::revert("no selector"));
        }
        let selector: [u8; 4] = data[..4].try_into().unwrap();

        let balance_owner = match selector {
            BALANCE_OF | GET_ETH_BALANCE => Self::owner_arg(data),
            _ => None,
        };
        if let Some(owner) = balance_owner {
            if self.revert_owners.contains(&owner)
                || (in_batch && self.batch_revert_owners.contains(&owner))
            {
                return Err(Self::revert("balance lookup failed"));
            }
            if in_batch && self.empty_owners.contains(&owner) {
                return Ok(Bytes::new());
            }
            if in_batch && self.garbage_owners.contains(&owner) {
                return Ok(Bytes::from_static(&[0xde, 0xad, 0xbe]));
            }
        }

        if target == MULTICALL3_ADDRESS && selector == GET_ETH_BALANCE {
            let owner = balance_owner.ok_or_else(|| Self::revert("bad argument"))?;
            return Ok(self.native_of(owner)?.abi_encode().into());
        }

        let (state, is_erc20) = match (self.erc20.get(&target), self.erc721.get(&target)) {
            (Some(state), _) => (state, true),
            (None, Some(state)) => (state, false),
            // No code at the target: calls succeed with empty output
            (None, None) => return Ok(Bytes::new()),
        };

        match selector {
            BALANCE_OF => {
                let owner = balance_owner.ok_or_else(|| Self::revert("bad argument"))?;
                let raw = state.balances.get(&owner).copied().unwrap_or_default();
                Ok(raw.abi_encode().into())
            }
            DECIMALS if is_erc20 => state
                .decimals
                .map(|d| U256::from(d).abi_encode().into())
                .ok_or_else(|| Self::revert("decimals not implemented")),
            SYMBOL => state
                .symbol
                .clone()
                .map(|s| s.abi_encode().into())
                .ok_or_else(|| Self::revert("symbol not implemented")),
            _ => Err(Self::revert("unknown selector")),
        }
    }

    async fn single<T>(&self, f: impl FnOnce() -> Result<T, ConnectorError>) -> Result<T, ConnectorError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        let result = f();
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

#[async_trait]
impl ChainConnector for MockChain {
    fn multicall_address(&self) -> Address {
        MULTICALL3_ADDRESS
    }

    async fn aggregate(&self, calls: Vec<AggregateCall>) -> Result<BatchResult, ConnectorError> {
        self.aggregate_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = &self.aggregate_failure {
            return Err(err.clone());
        }
        let mut results: BatchResult = calls
            .iter()
            .map(|call| match self.eval(call.target, &call.call_data, true) {
                Ok(return_data) => SubCallResult { success: true, return_data },
                Err(_) => SubCallResult::default(),
            })
            .collect();
        results.truncate(results.len().saturating_sub(self.aggregate_drop));
        Ok(results)
    }

    async fn call(&self, target: Address, data: Bytes) -> Result<Bytes, ConnectorError> {
        match Self::owner_arg(&data).filter(|_| data[..4] == BALANCE_OF) {
            Some(owner) => {
                self.single_queries.lock().unwrap().push(owner);
                self.single(|| self.eval(target, &data, false)).await
            }
            None => {
                self.probe_calls.fetch_add(1, Ordering::SeqCst);
                self.eval(target, &data, false)
            }
        }
    }

    async fn native_balance(&self, owner: Address) -> Result<U256, ConnectorError> {
        if owner == NATIVE_TOKEN {
            self.probe_calls.fetch_add(1, Ordering::SeqCst);
            return self.native_of(owner);
        }
        self.single_queries.lock().unwrap().push(owner);
        self.single(|| self.native_of(owner)).await
    }
}
