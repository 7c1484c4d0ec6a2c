//! Error types for batch balance queries
//!
//! Errors are grouped by the stage that raises them:
//! - Configuration errors, raised before any network activity
//! - Connection errors, raised while establishing the node connection
//! - Connector errors, raised by individual RPC calls
//! - Checker and detection errors, raised while binding a token
//!
//! Only configuration, connection and detection errors (and decode errors under
//! the session decode policy) abort a session. Everything else is absorbed into
//! the per-address `success` flag.

use alloy::primitives::Address;
use thiserror::Error;

/// Top-level error type for a query session
#[derive(Debug, Error)]
pub enum QueryError {
    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Node connection could not be established
    #[error("Failed to connect: {0}")]
    Connect(#[from] ConnectError),

    /// No usable checker for the token
    #[error("Token detection failed: {0}")]
    Detect(#[from] DetectError),

    /// A nominally successful sub-call returned undecodable data
    #[error("Failed to decode {method} result for {owner} at index {index}: {reason}")]
    Decode {
        index: usize,
        owner: Address,
        method: &'static str,
        reason: String,
    },

    /// Internal invariant broken (e.g. the fallback admission gate closed)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid or malformed RPC URL
    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    /// Token type tag outside {native, erc20, erc721}
    #[error("Invalid token_type '{0}'. Valid values are: native, erc20, erc721")]
    InvalidTokenType(String),

    /// Address that does not parse as 20 hex bytes
    #[error("Invalid address '{0}'")]
    InvalidAddress(String),

    /// Config or address file could not be read
    #[error("Failed to read {path}: {reason}")]
    Read { path: String, reason: String },

    /// Config file is not valid JSON for the expected shape
    #[error("Failed to parse {path}: {reason}")]
    Parse { path: String, reason: String },
}

/// Connection establishment errors
#[derive(Debug, Error)]
pub enum ConnectError {
    /// RPC URL rejected before dialing
    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    /// A single connection attempt failed
    #[error("Connection attempt failed: {0}")]
    Attempt(String),

    /// All connection attempts failed
    #[error("Connection failed after {attempts} attempts: {last_error}")]
    Exhausted { attempts: u32, last_error: String },
}

/// Errors returned by a single connector call
///
/// `Transport` covers everything where the node gave no verdict on the call
/// (connection loss, timeout, malformed response); `Revert` means the node
/// executed the call and it failed at contract level.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConnectorError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Execution reverted: {0}")]
    Revert(String),
}

impl ConnectorError {
    pub fn is_transport(&self) -> bool {
        matches!(self, ConnectorError::Transport(_))
    }
}

/// Errors returned by a checker for a single query
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CheckError {
    /// Underlying call failed
    #[error("Call to {address} failed: {source}")]
    Call {
        address: Address,
        #[source]
        source: ConnectorError,
    },

    /// Call succeeded but returned data of the wrong shape
    #[error("Failed to decode {method} from {address}: {reason}")]
    Decode {
        address: Address,
        method: &'static str,
        reason: String,
    },
}

/// Token type detection errors
#[derive(Debug, Error)]
pub enum DetectError {
    /// Every candidate probe failed
    #[error("No checker could be bound for token {token}: {}", .failures.join("; "))]
    Exhausted { token: Address, failures: Vec<String> },

    /// Explicitly requested checker failed to bind
    #[error("Failed to bind {token_type} checker for token {token}: {source}")]
    Bind {
        token: Address,
        token_type: crate::types::TokenType,
        #[source]
        source: CheckError,
    },
}
