//! Multicall utilities for batch contract calls
//!
//! Encodes sub-calls into a single Multicall3 `aggregate3` invocation and
//! decodes the positional results. Every sub-call carries its own
//! `allowFailure` flag, so one reverting sub-call does not abort the batch.
//!
//! Native balances have no owning contract; they are read through
//! Multicall3's own `getEthBalance(address)`, so those sub-calls target the
//! aggregator contract itself.

use alloy::{
    primitives::{Address, Bytes, U256},
    sol_types::SolCall,
};

use crate::types::{AggregateCall, BatchResult, SubCallResult};

// Multicall3 interface - standard and widely supported

mod multicall3 {
    use alloy::sol;

    sol! {
        #[derive(Debug)]
        struct Call3 {
            address target;
            bool allowFailure;
            bytes callData;
        }

        #[derive(Debug)]
        struct Call3Result {
            bool success;
            bytes returnData;
        }

        contract Multicall3 {
            function aggregate3(Call3[] calldata calls)
                public payable
                returns (Call3Result[] memory returnData);

            function getEthBalance(address addr)
                public view
                returns (uint256 balance);
        }
    }
}

pub use multicall3::{Call3, Call3Result, Multicall3};
use multicall3::Multicall3::{aggregate3Call, getEthBalanceCall};

/// Encode an `aggregate3` invocation for the given sub-calls
pub fn encode_aggregate3(calls: &[AggregateCall]) -> Bytes {
    let calls = calls
        .iter()
        .map(|call| Call3 {
            target: call.target,
            allowFailure: call.allow_failure,
            callData: call.call_data.clone(),
        })
        .collect();
    aggregate3Call { calls }.abi_encode().into()
}

/// Decode the result list returned by `aggregate3`
pub fn decode_aggregate3(data: &[u8]) -> Result<BatchResult, alloy::sol_types::Error> {
    let results = aggregate3Call::abi_decode_returns(data)?;
    Ok(results
        .into_iter()
        .map(|r| SubCallResult {
            success: r.success,
            return_data: r.returnData,
        })
        .collect())
}

/// Encode `getEthBalance(owner)`
pub fn encode_get_eth_balance(owner: Address) -> Bytes {
    getEthBalanceCall { addr: owner }.abi_encode().into()
}

/// Decode the wei amount returned by `getEthBalance`
pub fn decode_get_eth_balance(data: &[u8]) -> Result<U256, alloy::sol_types::Error> {
    getEthBalanceCall::abi_decode_returns(data)
}
