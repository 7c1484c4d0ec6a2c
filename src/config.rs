//! Session and connection configuration
//!
//! All structs deserialize from JSON with defaults for every optional field,
//! so a minimal `config.json` only needs `rpc_url` and `token_address`:
//!
//! ```json
//! {
//!   "rpc_url": "https://eth.llamarpc.com",
//!   "token_address": "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48",
//!   "token_type": "erc20",
//!   "query": { "concurrency": 10 }
//! }
//! ```

use std::{path::Path, str::FromStr, time::Duration};

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use crate::{
    errors::ConfigError,
    types::{TokenType, MULTICALL3_ADDRESS},
};

/// Default ceiling of simultaneous fallback queries
pub const DEFAULT_CONCURRENCY: usize = 20;

/// What a decode failure on a successful sub-call means for the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodePolicy {
    /// Mark the position failed so the fallback stage retries it
    #[default]
    Item,
    /// Abort the whole session
    Session,
}

/// Parameters of a query session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Multicall3-compatible aggregator contract
    pub multicall_address: Address,
    /// Maximum in-flight fallback queries
    pub concurrency: usize,
    /// Symbol reported for native balances
    pub native_symbol: String,
    /// Handling of undecodable sub-call results
    pub decode_policy: DecodePolicy,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            multicall_address: MULTICALL3_ADDRESS,
            concurrency: DEFAULT_CONCURRENCY,
            native_symbol: "ETH".to_string(),
            decode_policy: DecodePolicy::Item,
        }
    }
}

impl QueryConfig {
    /// Concurrency ceiling, never below one
    pub fn effective_concurrency(&self) -> usize {
        self.concurrency.max(1)
    }
}

/// Connection parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectConfig {
    /// Connection attempts before giving up
    pub max_retries: u32,
    /// Fixed pause between attempts
    pub retry_interval_ms: u64,
    /// Timeout applied to every RPC request
    pub request_timeout_ms: u64,
}

impl Default for ConnectConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_interval_ms: 1_000,
            request_timeout_ms: 3_000,
        }
    }
}

impl ConnectConfig {
    pub fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.retry_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP(S) or WebSocket RPC endpoint
    pub rpc_url: String,
    /// Token contract to query
    pub token_address: String,
    /// "native", "erc20", "erc721", or empty for auto-detection
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub query: QueryConfig,
    #[serde(default)]
    pub connect: ConnectConfig,
}

impl AppConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json(&text).map_err(|e| match e {
            ConfigError::Parse { reason, .. } => ConfigError::Parse {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }

    /// Parse configuration from a JSON string
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|e| ConfigError::Parse {
            path: "<inline>".to_string(),
            reason: e.to_string(),
        })
    }

    /// Parsed token contract address
    pub fn token_address(&self) -> Result<Address, ConfigError> {
        Address::from_str(self.token_address.trim())
            .map_err(|_| ConfigError::InvalidAddress(self.token_address.clone()))
    }

    /// Parsed token type; `None` requests auto-detection
    pub fn token_type(&self) -> Result<Option<TokenType>, ConfigError> {
        TokenType::parse_optional(&self.token_type)
    }
}
