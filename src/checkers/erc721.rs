use alloy::primitives::Address;
use async_trait::async_trait;
use bigdecimal::BigDecimal;

use super::{call_contract, decode_error};
use crate::{
    errors::CheckError,
    traits::{BalanceChecker, SharedConnector},
    types::TokenMeta,
    utils::{balance_utils::to_decimal, erc721_utils},
};

/// Balance checker for an ERC721 collection
///
/// Balances are item counts; no decimal scaling is applied.
pub struct Erc721Checker {
    connector: SharedConnector,
    token: Address,
    meta: TokenMeta,
}

impl Erc721Checker {
    /// Bind to `token`; requires a decodable `symbol()`
    pub async fn bind(connector: SharedConnector, token: Address) -> Result<Self, CheckError> {
        let output = call_contract(&connector, token, erc721_utils::encode_symbol()).await?;
        let symbol = erc721_utils::decode_symbol(&output).map_err(decode_error(token, "symbol"))?;
        Ok(Self {
            connector,
            token,
            meta: TokenMeta::erc721(symbol),
        })
    }

    pub fn token_address(&self) -> Address {
        self.token
    }
}

#[async_trait]
impl BalanceChecker for Erc721Checker {
    fn meta(&self) -> &TokenMeta {
        &self.meta
    }

    async fn balance_of(&self, owner: Address) -> Result<BigDecimal, CheckError> {
        let output = call_contract(
            &self.connector,
            self.token,
            erc721_utils::encode_balance_of(owner),
        )
        .await?;
        if output.is_empty() {
            return Ok(BigDecimal::default());
        }
        let count = erc721_utils::decode_balance_of(&output)
            .map_err(decode_error(self.token, "balanceOf"))?;
        Ok(to_decimal(count, 0))
    }
}
