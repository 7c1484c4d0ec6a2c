//! ERC20 token utilities for encoding queries and decoding their results
//!
//! Provides the call data for `balanceOf`, `decimals` and `symbol` and the
//! matching return decoders.

use alloy::{
    primitives::{Address, Bytes, U256},
    sol,
    sol_types::SolCall,
};

// ERC20 interface for the methods a balance checker needs
//
// Generates Rust bindings for:
// - balanceOf(address): Returns token balance for an address
// - decimals(): Returns token decimal places
// - symbol(): Returns token symbol
sol! {
    interface IERC20 {
        function balanceOf(address owner) external view returns (uint256);
        function decimals() external view returns (uint8);
        function symbol() external view returns (string);
    }
}

/// Encode `balanceOf(owner)`
pub fn encode_balance_of(owner: Address) -> Bytes {
    IERC20::balanceOfCall { owner }.abi_encode().into()
}

/// Encode `decimals()`
pub fn encode_decimals() -> Bytes {
    IERC20::decimalsCall {}.abi_encode().into()
}

/// Encode `symbol()`
pub fn encode_symbol() -> Bytes {
    IERC20::symbolCall {}.abi_encode().into()
}

/// Decode the `uint256` returned by `balanceOf`
pub fn decode_balance_of(data: &[u8]) -> Result<U256, alloy::sol_types::Error> {
    IERC20::balanceOfCall::abi_decode_returns(data)
}

/// Decode the `uint8` returned by `decimals`
pub fn decode_decimals(data: &[u8]) -> Result<u8, alloy::sol_types::Error> {
    IERC20::decimalsCall::abi_decode_returns(data)
}

/// Decode the value returned by `symbol`
///
/// Accepts the standard `string` return as well as the `bytes32` symbols of
/// early tokens (e.g. MKR), which are right-padded with zeros.
pub fn decode_symbol(data: &[u8]) -> Result<String, alloy::sol_types::Error> {
    match IERC20::symbolCall::abi_decode_returns(data) {
        Ok(symbol) => Ok(symbol),
        Err(err) if data.len() == 32 => {
            let end = data.iter().position(|b| *b == 0).unwrap_or(data.len());
            match std::str::from_utf8(&data[..end]) {
                Ok(symbol) if !symbol.is_empty() => Ok(symbol.to_string()),
                _ => Err(err),
            }
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::{primitives::address, sol_types::SolValue};

    #[test]
    fn test_balance_of_selector() {
        let data = encode_balance_of(address!("28C6c06298d514Db089934071355E5743bf21d60"));
        // keccak256("balanceOf(address)")[..4]
        assert_eq!(&data[..4], &[0x70, 0xa0, 0x82, 0x31]);
        assert_eq!(&data[16..], address!("28C6c06298d514Db089934071355E5743bf21d60").as_slice());
    }

    #[test]
    fn test_decode_string_symbol() {
        let encoded = "USDC".to_string().abi_encode();
        assert_eq!(decode_symbol(&encoded).unwrap(), "USDC");
    }

    #[test]
    fn test_decode_bytes32_symbol() {
        let mut raw = [0u8; 32];
        raw[..3].copy_from_slice(b"MKR");
        assert_eq!(decode_symbol(&raw).unwrap(), "MKR");
        assert!(decode_symbol(&[0u8; 32]).is_err());
    }

    #[test]
    fn test_decode_decimals() {
        let encoded = U256::from(6u8).abi_encode();
        assert_eq!(decode_decimals(&encoded).unwrap(), 6);
        assert!(decode_decimals(&[]).is_err());
    }
}
