use alloy::primitives::Address;
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use log::debug;

use super::{call_contract, decode_error};
use crate::{
    errors::CheckError,
    traits::{BalanceChecker, SharedConnector},
    types::{TokenMeta, UNKNOWN_SYMBOL},
    utils::{balance_utils::to_decimal, erc20_utils},
};

/// Balance checker for an ERC20 token
pub struct Erc20Checker {
    connector: SharedConnector,
    token: Address,
    meta: TokenMeta,
}

impl Erc20Checker {
    /// Bind to `token`, loading its decimals and symbol
    ///
    /// Decimals must be fetched successfully; the symbol falls back to
    /// `"UNKNOWN"` on any error.
    pub async fn bind(connector: SharedConnector, token: Address) -> Result<Self, CheckError> {
        let output = call_contract(&connector, token, erc20_utils::encode_decimals()).await?;
        let decimals =
            erc20_utils::decode_decimals(&output).map_err(decode_error(token, "decimals"))?;

        let symbol = match call_contract(&connector, token, erc20_utils::encode_symbol()).await {
            Ok(output) => erc20_utils::decode_symbol(&output).ok(),
            Err(e) => {
                debug!("symbol() unavailable for {token}: {e}");
                None
            }
        }
        .unwrap_or_else(|| UNKNOWN_SYMBOL.to_string());

        Ok(Self {
            connector,
            token,
            meta: TokenMeta::erc20(symbol, decimals),
        })
    }

    pub fn token_address(&self) -> Address {
        self.token
    }
}

#[async_trait]
impl BalanceChecker for Erc20Checker {
    fn meta(&self) -> &TokenMeta {
        &self.meta
    }

    async fn balance_of(&self, owner: Address) -> Result<BigDecimal, CheckError> {
        let output = call_contract(
            &self.connector,
            self.token,
            erc20_utils::encode_balance_of(owner),
        )
        .await?;
        if output.is_empty() {
            return Ok(BigDecimal::default());
        }
        let raw = erc20_utils::decode_balance_of(&output)
            .map_err(decode_error(self.token, "balanceOf"))?;
        Ok(to_decimal(raw, self.meta.decimals))
    }
}
