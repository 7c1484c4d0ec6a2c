//! Utility functions for token balance queries
//!
//! # Modules
//!
//! - [`erc20_utils`]: ERC20 call encoding and decoding
//!   - `balanceOf`, `decimals`, `symbol`
//!
//! - [`erc721_utils`]: ERC721 call encoding and decoding
//!   - `balanceOf`, `symbol`
//!
//! - [`multicall_utils`]: Multicall3 call encoding and decoding
//!   - `aggregate3` with per-call failure tolerance
//!   - `getEthBalance` for native balances
//!
//! - [`balance_utils`]: Raw balance scaling
//!
//! - [`address_utils`]: Wallet address list parsing
//!
//! # Example
//!
//! ```
//! use chain_lens::utils::{balance_utils::to_decimal, erc20_utils};
//! use alloy::primitives::{address, U256};
//!
//! let data = erc20_utils::encode_balance_of(address!("28C6c06298d514Db089934071355E5743bf21d60"));
//! assert_eq!(data.len(), 4 + 32);
//! assert_eq!(to_decimal(U256::from(1_500_000u64), 6).to_string(), "1.500000");
//! ```

/// ERC20 token call codec
pub mod erc20_utils;

/// ERC721 token call codec
pub mod erc721_utils;

/// Multicall3 call codec
pub mod multicall_utils;

/// Balance scaling utilities
pub mod balance_utils;

/// Address list parsing utilities
pub mod address_utils;
