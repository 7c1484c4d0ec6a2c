//! Trait definitions at the seams of a query session
//!
//! # Key Traits
//! - `ChainConnector`: the node-facing primitives a session needs
//! - `BalanceChecker`: single-address balance lookup for one bound token

use std::sync::Arc;

use alloy::primitives::{Address, Bytes, U256};
use async_trait::async_trait;
use bigdecimal::BigDecimal;

use crate::{
    errors::{CheckError, ConnectorError},
    types::{AggregateCall, BatchResult, TokenMeta, TokenType},
};

/// Connector shared between the session, its checkers and fallback tasks
pub type SharedConnector = Arc<dyn ChainConnector>;

/// Node-facing primitives
///
/// Implementations own transport concerns (retries at startup, per-call
/// timeouts). They must report contract-level failures as
/// [`ConnectorError::Revert`] and everything else as
/// [`ConnectorError::Transport`].
#[async_trait]
pub trait ChainConnector: Send + Sync {
    /// Address of the Multicall3-compatible aggregator contract
    fn multicall_address(&self) -> Address;

    /// Execute all sub-calls in one aggregate invocation
    ///
    /// On success the result has one entry per submitted call, in order.
    async fn aggregate(&self, calls: Vec<AggregateCall>) -> Result<BatchResult, ConnectorError>;

    /// Execute one read-only call and return its raw output
    async fn call(&self, target: Address, data: Bytes) -> Result<Bytes, ConnectorError>;

    /// Native currency balance of `owner`, in wei
    async fn native_balance(&self, owner: Address) -> Result<U256, ConnectorError>;
}

/// Single-address balance lookup for a bound token
#[async_trait]
pub trait BalanceChecker: Send + Sync {
    /// Metadata bound when the checker was created
    fn meta(&self) -> &TokenMeta;

    /// Token type handled by this checker
    fn token_type(&self) -> TokenType {
        self.meta().token_type
    }

    /// Scaled balance of `owner`
    async fn balance_of(&self, owner: Address) -> Result<BigDecimal, CheckError>;
}
