//! Chain connector backed by an alloy provider
//!
//! [`RpcConnector`] implements [`ChainConnector`] over JSON-RPC:
//! - aggregate calls are one `eth_call` to Multicall3 `aggregate3`
//! - single calls are plain `eth_call`s
//! - native balances are `eth_getBalance` at the latest block
//!
//! Every request is bounded by the configured request timeout. Node errors
//! that carry a revert verdict map to [`ConnectorError::Revert`]; anything
//! else (connection loss, timeouts, malformed responses) maps to
//! [`ConnectorError::Transport`].

pub mod builder;

use std::{future::IntoFuture, time::Duration};

use alloy::{
    network::TransactionBuilder,
    primitives::{Address, Bytes, U256},
    providers::{DynProvider, Provider},
    rpc::types::TransactionRequest,
    sol_types::decode_revert_reason,
    transports::{TransportError, TransportResult},
};
use async_trait::async_trait;

use crate::{
    errors::ConnectorError,
    traits::ChainConnector,
    types::{AggregateCall, BatchResult},
    utils::multicall_utils::{decode_aggregate3, encode_aggregate3},
};

pub use builder::{connect, get_provider};

/// JSON-RPC error code used by geth-compatible nodes for reverted calls
const EXECUTION_REVERTED_CODE: i64 = 3;

/// Connector over an alloy provider
#[derive(Clone, Debug)]
pub struct RpcConnector {
    provider: DynProvider,
    multicall_address: Address,
    request_timeout: Duration,
    chain_id: u64,
}

impl RpcConnector {
    pub fn new(
        provider: DynProvider,
        multicall_address: Address,
        request_timeout: Duration,
        chain_id: u64,
    ) -> Self {
        Self {
            provider,
            multicall_address,
            request_timeout,
            chain_id,
        }
    }

    /// Chain id reported by the node at connection time
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Underlying provider
    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }

    async fn timed<T, F>(&self, request: F) -> Result<T, ConnectorError>
    where
        F: IntoFuture<Output = TransportResult<T>>,
    {
        match tokio::time::timeout(self.request_timeout, request).await {
            Ok(result) => result.map_err(classify_error),
            Err(_) => Err(ConnectorError::Transport(format!(
                "request timed out after {:?}",
                self.request_timeout
            ))),
        }
    }
}

/// Map a transport-level error to the connector taxonomy
pub(crate) fn classify_error(err: TransportError) -> ConnectorError {
    if let Some(payload) = err.as_error_resp() {
        let is_revert = payload.code == EXECUTION_REVERTED_CODE
            || payload.message.to_ascii_lowercase().contains("revert");
        if is_revert {
            let reason = payload
                .as_revert_data()
                .and_then(|data| decode_revert_reason(&data))
                .unwrap_or_else(|| payload.message.to_string());
            return ConnectorError::Revert(reason);
        }
    }
    ConnectorError::Transport(err.to_string())
}

#[async_trait]
impl ChainConnector for RpcConnector {
    fn multicall_address(&self) -> Address {
        self.multicall_address
    }

    async fn aggregate(&self, calls: Vec<AggregateCall>) -> Result<BatchResult, ConnectorError> {
        if calls.is_empty() {
            return Ok(Vec::new());
        }
        let data = encode_aggregate3(&calls);
        let output = self.call(self.multicall_address, data).await?;
        // An address without code answers eth_call with empty output
        decode_aggregate3(&output).map_err(|e| {
            ConnectorError::Transport(format!("malformed aggregate3 response: {e}"))
        })
    }

    async fn call(&self, target: Address, data: Bytes) -> Result<Bytes, ConnectorError> {
        let tx = TransactionRequest::default()
            .with_to(target)
            .with_input(data);
        self.timed(self.provider.call(tx)).await
    }

    async fn native_balance(&self, owner: Address) -> Result<U256, ConnectorError> {
        self.timed(self.provider.get_balance(owner)).await
    }
}
