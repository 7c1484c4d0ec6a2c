//! # Chain Lens
//!
//! Batch token balance queries for EVM chains.
//!
//! ## Core Features
//!
//! - **Batch Aggregation**
//!   - N balance lookups in one Multicall3 `aggregate3` round trip
//!   - Per-position failure isolation (`allowFailure = true`)
//!   - Exact decimal scaling of raw integer balances
//!
//! - **Fallback Recovery**
//!   - Individual re-query of every position the batch left unresolved
//!   - Bounded concurrency through a semaphore (20 by default)
//!   - Whole-list fallback when the aggregate call itself fails
//!
//! - **Token Type Detection**
//!   - ERC20, ERC721 and native currency
//!   - Explicit binding or probing in fixed order
//!
//! ## Features
//!
//! - `rustls-tls`: Uses rustls as the TLS implementation instead of native-tls (OpenSSL).
//!
//!   Usage example:
//!   ```toml
//!   [dependencies]
//!   chain-lens = { version = "0.1.0", default-features = false, features = ["rustls-tls"] }
//!   ```
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use chain_lens::{connect, BalanceSession, ConnectConfig, QueryConfig, TokenType};
//! use alloy::primitives::address;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let query = QueryConfig::default();
//! let connector = connect(
//!     "https://eth.llamarpc.com",
//!     &ConnectConfig::default(),
//!     query.multicall_address,
//! )
//! .await?;
//!
//! let session = BalanceSession::new(Arc::new(connector), query);
//! let usdc = address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");
//! let wallets = vec![
//!     address!("47ac0Fb4F2D84898e4D9E7b4DaB3C24507a6D503"),
//!     address!("28C6c06298d514Db089934071355E5743bf21d60"),
//! ];
//!
//! let report = session.run(usdc, Some(TokenType::Erc20), &wallets).await?;
//! for tb in report.balances.iter().filter(|tb| tb.success) {
//!     println!("{}: {} {}", tb.owner, tb.balance, tb.symbol);
//! }
//! println!("{}", report.summary);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Structure
//!
//! - `connector`: alloy-backed node connection and RPC primitives
//! - `checkers`: single-address balance checkers per token type
//! - `detector`: token type detection
//! - `aggregator`: Multicall3 batch construction and decoding
//! - `reconciler`: bounded-concurrency fallback
//! - `session`: the end-to-end query pipeline
//! - `types`, `traits`, `errors`, `config`: shared definitions
//! - `utils`: ABI codecs, scaling and address-list parsing

pub mod aggregator;
pub mod checkers;
pub mod config;
pub mod connector;
pub mod detector;
pub mod errors;
pub mod reconciler;
pub mod session;
pub mod summary;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export only the essential types and functions
pub use config::{AppConfig, ConnectConfig, DecodePolicy, QueryConfig};
pub use connector::{connect, RpcConnector};
pub use errors::QueryError;
pub use session::{BalanceSession, SessionReport};
pub use summary::BalanceSummary;
pub use traits::{BalanceChecker, ChainConnector, SharedConnector};
pub use types::{TokenBalance, TokenMeta, TokenType};
