//! Batch aggregation of balance queries
//!
//! Turns N independent balance lookups into one `aggregate3` round trip.
//! Sub-calls are positionally aligned with the owner list; position `i` of
//! the result always belongs to `owners[i]`.

use alloy::primitives::Address;
use bigdecimal::BigDecimal;
use log::{debug, info, warn};
use thiserror::Error;

use crate::{
    config::DecodePolicy,
    errors::ConnectorError,
    traits::ChainConnector,
    types::{AggregateCall, BatchResult, CallItem, TokenBalance, TokenMeta, TokenType, NATIVE_DECIMALS},
    utils::{balance_utils::to_decimal, erc20_utils, erc721_utils, multicall_utils},
};

/// Failures of a batch as a whole
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BatchError {
    /// The aggregate invocation itself failed
    #[error("aggregate3 call failed: {0}")]
    Aggregate(#[from] ConnectorError),

    /// The aggregator answered with a different number of results
    #[error("aggregate3 returned {actual} results for {expected} calls")]
    LengthMismatch { expected: usize, actual: usize },

    /// A successful sub-call returned undecodable data (session decode policy)
    #[error("failed to decode {method} result for {owner} at index {index}: {reason}")]
    Decode {
        index: usize,
        owner: Address,
        method: &'static str,
        reason: String,
    },
}

impl BatchError {
    /// Whether every address of the batch should be retried individually
    pub fn is_session_fallback(&self) -> bool {
        matches!(self, BatchError::Aggregate(_) | BatchError::LengthMismatch { .. })
    }
}

/// Build one call item per owner
///
/// ERC20 and ERC721 lookups call `balanceOf(owner)` on the token contract.
/// Native lookups call `getEthBalance(owner)` on the aggregator contract.
pub fn build_call_items(
    token_type: TokenType,
    token: Address,
    multicall: Address,
    owners: &[Address],
) -> Vec<CallItem> {
    owners
        .iter()
        .map(|&owner| match token_type {
            TokenType::Erc20 => CallItem {
                target: token,
                owner,
                token_type,
                call_data: erc20_utils::encode_balance_of(owner),
                method: "balanceOf",
            },
            TokenType::Erc721 => CallItem {
                target: token,
                owner,
                token_type,
                call_data: erc721_utils::encode_balance_of(owner),
                method: "balanceOf",
            },
            TokenType::Native => CallItem {
                target: multicall,
                owner,
                token_type,
                call_data: multicall_utils::encode_get_eth_balance(owner),
                method: "getEthBalance",
            },
        })
        .collect()
}

fn decode_item(item: &CallItem, data: &[u8], meta: &TokenMeta) -> Result<BigDecimal, alloy::sol_types::Error> {
    match item.token_type {
        TokenType::Erc20 => erc20_utils::decode_balance_of(data).map(|raw| to_decimal(raw, meta.decimals)),
        TokenType::Erc721 => erc721_utils::decode_balance_of(data).map(|count| to_decimal(count, 0)),
        TokenType::Native => {
            multicall_utils::decode_get_eth_balance(data).map(|wei| to_decimal(wei, NATIVE_DECIMALS))
        }
    }
}

/// Decode a batch result against the call items it answers
///
/// - failed sub-call: `success = false`, zero balance
/// - successful sub-call with empty data: `success = true`, zero balance
/// - otherwise: decoded and scaled balance
///
/// Undecodable data on a successful sub-call is handled per `policy`.
pub fn decode_batch(
    items: &[CallItem],
    results: BatchResult,
    meta: &TokenMeta,
    token: Address,
    policy: DecodePolicy,
) -> Result<Vec<TokenBalance>, BatchError> {
    if results.len() != items.len() {
        return Err(BatchError::LengthMismatch {
            expected: items.len(),
            actual: results.len(),
        });
    }

    let mut balances = Vec::with_capacity(items.len());
    for (index, (item, result)) in items.iter().zip(results).enumerate() {
        let mut tb = TokenBalance::failed(meta, token, item.owner);
        if !result.success {
            balances.push(tb);
            continue;
        }
        // No observable state for this query: a legitimate zero balance
        if result.return_data.is_empty() {
            tb.success = true;
            balances.push(tb);
            continue;
        }
        match decode_item(item, &result.return_data, meta) {
            Ok(balance) => {
                tb.balance = balance;
                tb.success = true;
            }
            Err(e) => match policy {
                DecodePolicy::Item => {
                    warn!("Undecodable {} result for {} at index {index}: {e}", item.method, item.owner);
                }
                DecodePolicy::Session => {
                    return Err(BatchError::Decode {
                        index,
                        owner: item.owner,
                        method: item.method,
                        reason: e.to_string(),
                    });
                }
            },
        }
        balances.push(tb);
    }
    Ok(balances)
}

/// Batch aggregator bound to a decode policy
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchAggregator {
    decode_policy: DecodePolicy,
}

impl BatchAggregator {
    pub fn new(decode_policy: DecodePolicy) -> Self {
        Self { decode_policy }
    }

    /// Query all owners in one aggregate call
    ///
    /// An empty owner list returns an empty result without a network call.
    pub async fn query(
        &self,
        connector: &dyn ChainConnector,
        meta: &TokenMeta,
        token: Address,
        owners: &[Address],
    ) -> Result<Vec<TokenBalance>, BatchError> {
        if owners.is_empty() {
            return Ok(Vec::new());
        }

        let items = build_call_items(meta.token_type, token, connector.multicall_address(), owners);
        let calls: Vec<AggregateCall> = items.iter().map(AggregateCall::from).collect();
        info!("Submitting {} {} sub-calls in one aggregate call", calls.len(), meta.token_type);

        let results = connector.aggregate(calls).await?;
        let balances = decode_batch(&items, results, meta, token, self.decode_policy)?;
        debug!(
            "Batch resolved {}/{} positions",
            balances.iter().filter(|tb| tb.success).count(),
            balances.len()
        );
        Ok(balances)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Bytes, SubCallResult, U256, MULTICALL3_ADDRESS};
    use alloy::sol_types::SolValue;
    use std::str::FromStr;

    const TOKEN: Address = Address::repeat_byte(0x70);

    fn owners(n: u8) -> Vec<Address> {
        (1..=n).map(Address::repeat_byte).collect()
    }

    fn ok(raw: u128) -> SubCallResult {
        SubCallResult {
            success: true,
            return_data: U256::from(raw).abi_encode().into(),
        }
    }

    #[test]
    fn test_native_calls_target_aggregator() {
        let items = build_call_items(TokenType::Native, TOKEN, MULTICALL3_ADDRESS, &owners(2));
        assert!(items.iter().all(|i| i.target == MULTICALL3_ADDRESS));
        assert!(items.iter().all(|i| i.method == "getEthBalance"));

        let items = build_call_items(TokenType::Erc20, TOKEN, MULTICALL3_ADDRESS, &owners(2));
        assert!(items.iter().all(|i| i.target == TOKEN && i.method == "balanceOf"));
        assert_eq!(items[1].owner, Address::repeat_byte(2));
    }

    #[test]
    fn test_decode_scales_erc20() {
        let meta = TokenMeta::erc20("TKN", 18);
        let items = build_call_items(TokenType::Erc20, TOKEN, MULTICALL3_ADDRESS, &owners(3));
        let results = vec![ok(0), ok(1_500_000_000_000_000_000), ok(2)];
        let balances = decode_batch(&items, results, &meta, TOKEN, DecodePolicy::Item).unwrap();
        assert_eq!(balances.len(), 3);
        assert_eq!(balances[1].balance, BigDecimal::from_str("1.5").unwrap());
        assert_eq!(balances[2].balance, BigDecimal::from_str("0.000000000000000002").unwrap());
        assert!(balances.iter().all(|tb| tb.success && tb.symbol == "TKN"));
    }

    #[test]
    fn test_failed_and_empty_sub_calls() {
        let meta = TokenMeta::erc721("PUNK");
        let items = build_call_items(TokenType::Erc721, TOKEN, MULTICALL3_ADDRESS, &owners(3));
        let results = vec![
            SubCallResult { success: false, return_data: Bytes::new() },
            SubCallResult { success: true, return_data: Bytes::new() },
            ok(4),
        ];
        let balances = decode_batch(&items, results, &meta, TOKEN, DecodePolicy::Item).unwrap();
        assert!(!balances[0].success);
        assert_eq!(balances[0].owner, Address::repeat_byte(1));
        assert!(balances[1].success);
        assert_eq!(balances[1].balance, BigDecimal::default());
        assert_eq!(balances[2].balance, BigDecimal::from(4));
    }

    #[test]
    fn test_decode_policy() {
        let meta = TokenMeta::native("ETH");
        let items = build_call_items(TokenType::Native, TOKEN, MULTICALL3_ADDRESS, &owners(2));
        let garbage = || vec![ok(1), SubCallResult { success: true, return_data: Bytes::from_static(&[1, 2, 3]) }];

        let balances = decode_batch(&items, garbage(), &meta, TOKEN, DecodePolicy::Item).unwrap();
        assert!(balances[0].success);
        assert!(!balances[1].success);

        let err = decode_batch(&items, garbage(), &meta, TOKEN, DecodePolicy::Session).unwrap_err();
        assert!(matches!(err, BatchError::Decode { index: 1, .. }));
        assert!(!err.is_session_fallback());
    }

    #[test]
    fn test_length_mismatch_is_session_level() {
        let meta = TokenMeta::erc20("TKN", 6);
        let items = build_call_items(TokenType::Erc20, TOKEN, MULTICALL3_ADDRESS, &owners(3));
        let err = decode_batch(&items, vec![ok(1)], &meta, TOKEN, DecodePolicy::Item).unwrap_err();
        assert_eq!(err, BatchError::LengthMismatch { expected: 3, actual: 1 });
        assert!(err.is_session_fallback());
    }
}
