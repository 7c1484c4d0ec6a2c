use alloy::primitives::Address;
use async_trait::async_trait;
use bigdecimal::BigDecimal;

use crate::{
    errors::CheckError,
    traits::{BalanceChecker, SharedConnector},
    types::{TokenMeta, NATIVE_DECIMALS},
    utils::balance_utils::to_decimal,
};

/// Balance checker for the chain's native currency
pub struct NativeChecker {
    connector: SharedConnector,
    token: Address,
    meta: TokenMeta,
}

impl NativeChecker {
    /// Bind after confirming the node answers a balance lookup
    ///
    /// `token` is only carried into results; native balances have no contract.
    pub async fn bind(
        connector: SharedConnector,
        token: Address,
        symbol: &str,
    ) -> Result<Self, CheckError> {
        connector
            .native_balance(token)
            .await
            .map_err(|source| CheckError::Call { address: token, source })?;
        Ok(Self {
            connector,
            token,
            meta: TokenMeta::native(symbol),
        })
    }

    pub fn token_address(&self) -> Address {
        self.token
    }
}

#[async_trait]
impl BalanceChecker for NativeChecker {
    fn meta(&self) -> &TokenMeta {
        &self.meta
    }

    async fn balance_of(&self, owner: Address) -> Result<BigDecimal, CheckError> {
        let wei = self
            .connector
            .native_balance(owner)
            .await
            .map_err(|source| CheckError::Call { address: owner, source })?;
        Ok(to_decimal(wei, NATIVE_DECIMALS))
    }
}
