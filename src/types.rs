//! Core types for batch balance queries
//!
//! This module defines the data structures that flow through a query session:
//! - Token classification and per-session token metadata
//! - Multicall sub-calls and their positional results
//! - Per-address balances and fallback work items

use std::{fmt, str::FromStr};

pub use alloy::primitives::{Address, Bytes, U256};
use bigdecimal::BigDecimal;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Canonical Multicall3 deployment address, identical on most EVM chains
pub const MULTICALL3_ADDRESS: Address =
    alloy::primitives::address!("cA11bde05977b3631167028862bE2a173976CA11");

/// Symbol used when a token does not answer `symbol()`
pub const UNKNOWN_SYMBOL: &str = "UNKNOWN";

/// Decimals of the native currency (wei → ether)
pub const NATIVE_DECIMALS: u8 = 18;

/// Kind of asset held at the queried contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Chain native currency (ETH, BNB, ...)
    Native,
    /// Fungible token
    Erc20,
    /// Non-fungible token; balances are item counts
    Erc721,
}

impl TokenType {
    /// Parse an optional token type tag.
    ///
    /// An empty (or whitespace-only) tag means "auto-detect" and yields `None`.
    pub fn parse_optional(tag: &str) -> Result<Option<Self>, ConfigError> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Ok(None);
        }
        tag.parse().map(Some)
    }
}

impl FromStr for TokenType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "native" => Ok(TokenType::Native),
            "erc20" => Ok(TokenType::Erc20),
            "erc721" => Ok(TokenType::Erc721),
            _ => Err(ConfigError::InvalidTokenType(s.to_string())),
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenType::Native => "native",
            TokenType::Erc20 => "erc20",
            TokenType::Erc721 => "erc721",
        };
        f.write_str(name)
    }
}

/// Token metadata bound once per session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenMeta {
    /// Detected or declared token type
    pub token_type: TokenType,
    /// Token symbol (e.g., "ETH", "USDC")
    pub symbol: String,
    /// Scaling exponent applied to raw balances, 0 for NFT counts
    pub decimals: u8,
}

impl TokenMeta {
    pub fn native(symbol: impl Into<String>) -> Self {
        Self {
            token_type: TokenType::Native,
            symbol: symbol.into(),
            decimals: NATIVE_DECIMALS,
        }
    }

    pub fn erc20(symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            token_type: TokenType::Erc20,
            symbol: symbol.into(),
            decimals,
        }
    }

    pub fn erc721(symbol: impl Into<String>) -> Self {
        Self {
            token_type: TokenType::Erc721,
            symbol: symbol.into(),
            decimals: 0,
        }
    }
}

/// Balance of one owner for the session's token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenBalance {
    /// Token symbol
    pub symbol: String,
    /// Queried token contract
    pub token_address: Address,
    /// Human-readable balance; zero unless `success` is set
    #[serde(serialize_with = "crate::utils::balance_utils::serialize_plain")]
    pub balance: BigDecimal,
    /// Wallet the balance belongs to
    pub owner: Address,
    /// Whether `balance` was actually observed on chain
    pub success: bool,
}

impl TokenBalance {
    /// A resolved balance
    pub fn resolved(meta: &TokenMeta, token_address: Address, owner: Address, balance: BigDecimal) -> Self {
        Self {
            symbol: meta.symbol.clone(),
            token_address,
            balance,
            owner,
            success: true,
        }
    }

    /// A placeholder for an owner whose balance is not (yet) known
    pub fn failed(meta: &TokenMeta, token_address: Address, owner: Address) -> Self {
        Self {
            symbol: meta.symbol.clone(),
            token_address,
            balance: BigDecimal::zero(),
            owner,
            success: false,
        }
    }
}

/// One encoded balance lookup inside a batch
///
/// Call items and batch results are matched by position only.
#[derive(Debug, Clone)]
pub struct CallItem {
    /// Contract the sub-call is sent to
    pub target: Address,
    /// Wallet whose balance is queried
    pub owner: Address,
    /// Token type, selects the decoder
    pub token_type: TokenType,
    /// ABI-encoded method invocation
    pub call_data: Bytes,
    /// Method name, for diagnostics
    pub method: &'static str,
}

/// Sub-call as submitted to the aggregator contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateCall {
    pub target: Address,
    pub call_data: Bytes,
    pub allow_failure: bool,
}

impl From<&CallItem> for AggregateCall {
    fn from(item: &CallItem) -> Self {
        Self {
            target: item.target,
            call_data: item.call_data.clone(),
            allow_failure: true,
        }
    }
}

/// Outcome of one sub-call of an aggregate invocation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubCallResult {
    pub success: bool,
    pub return_data: Bytes,
}

/// Ordered results of one aggregate invocation
pub type BatchResult = Vec<SubCallResult>;

/// Position in the result array that needs an individual query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryTask {
    pub index: usize,
    pub address: Address,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_token_type() {
        assert_eq!("native".parse::<TokenType>().unwrap(), TokenType::Native);
        assert_eq!("ERC20".parse::<TokenType>().unwrap(), TokenType::Erc20);
        assert_eq!(" Erc721 ".parse::<TokenType>().unwrap(), TokenType::Erc721);
        assert!("erc1155".parse::<TokenType>().is_err());
    }

    #[test]
    fn test_empty_tag_means_auto_detect() {
        assert_eq!(TokenType::parse_optional("").unwrap(), None);
        assert_eq!(TokenType::parse_optional("   ").unwrap(), None);
        assert_eq!(TokenType::parse_optional("erc20").unwrap(), Some(TokenType::Erc20));
        assert!(TokenType::parse_optional("coin").is_err());
    }

    #[test]
    fn test_failed_placeholder_is_zero() {
        let meta = TokenMeta::erc20("USDC", 6);
        let tb = TokenBalance::failed(&meta, Address::ZERO, Address::repeat_byte(1));
        assert!(!tb.success);
        assert_eq!(tb.balance, BigDecimal::default());
        assert_eq!(tb.owner, Address::repeat_byte(1));
        assert_eq!(tb.symbol, "USDC");
    }
}
