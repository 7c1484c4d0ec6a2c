//! Per-token-type balance checkers
//!
//! A checker is bound to one token contract and answers single-address
//! balance queries. Binding issues the network probe that the type detector
//! uses to classify a contract:
//! - [`Erc20Checker`]: `decimals()` must succeed; `symbol()` is optional
//! - [`Erc721Checker`]: `symbol()` must succeed; balances are unscaled counts
//! - [`NativeChecker`]: the node must answer a native balance lookup

mod erc20;
mod erc721;
mod native;

pub use erc20::Erc20Checker;
pub use erc721::Erc721Checker;
pub use native::NativeChecker;

use alloy::primitives::{Address, Bytes};
use async_trait::async_trait;
use bigdecimal::BigDecimal;

use crate::{
    errors::CheckError,
    traits::{BalanceChecker, SharedConnector},
    types::TokenMeta,
};

/// Checker for any supported token type
pub enum TokenChecker {
    Erc20(Erc20Checker),
    Erc721(Erc721Checker),
    Native(NativeChecker),
}

impl TokenChecker {
    /// Contract the checker was bound to
    pub fn token_address(&self) -> Address {
        match self {
            TokenChecker::Erc20(c) => c.token_address(),
            TokenChecker::Erc721(c) => c.token_address(),
            TokenChecker::Native(c) => c.token_address(),
        }
    }
}

impl From<Erc20Checker> for TokenChecker {
    fn from(checker: Erc20Checker) -> Self {
        TokenChecker::Erc20(checker)
    }
}

impl From<Erc721Checker> for TokenChecker {
    fn from(checker: Erc721Checker) -> Self {
        TokenChecker::Erc721(checker)
    }
}

impl From<NativeChecker> for TokenChecker {
    fn from(checker: NativeChecker) -> Self {
        TokenChecker::Native(checker)
    }
}

#[async_trait]
impl BalanceChecker for TokenChecker {
    fn meta(&self) -> &TokenMeta {
        match self {
            TokenChecker::Erc20(c) => c.meta(),
            TokenChecker::Erc721(c) => c.meta(),
            TokenChecker::Native(c) => c.meta(),
        }
    }

    async fn balance_of(&self, owner: Address) -> Result<BigDecimal, CheckError> {
        match self {
            TokenChecker::Erc20(c) => c.balance_of(owner).await,
            TokenChecker::Erc721(c) => c.balance_of(owner).await,
            TokenChecker::Native(c) => c.balance_of(owner).await,
        }
    }
}

/// Issue a read-only call, tagging failures with the target address
pub(crate) async fn call_contract(
    connector: &SharedConnector,
    target: Address,
    data: Bytes,
) -> Result<Bytes, CheckError> {
    connector
        .call(target, data)
        .await
        .map_err(|source| CheckError::Call { address: target, source })
}

pub(crate) fn decode_error(
    address: Address,
    method: &'static str,
) -> impl FnOnce(alloy::sol_types::Error) -> CheckError {
    move |e| CheckError::Decode {
        address,
        method,
        reason: e.to_string(),
    }
}
