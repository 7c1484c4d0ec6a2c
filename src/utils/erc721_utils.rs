//! ERC721 token utilities
//!
//! `balanceOf` shares its selector with ERC20 but the result is an item count
//! and is never scaled.

use alloy::{
    primitives::{Address, Bytes, U256},
    sol,
    sol_types::SolCall,
};

sol! {
    interface IERC721 {
        function balanceOf(address owner) external view returns (uint256);
        function symbol() external view returns (string);
    }
}

/// Encode `balanceOf(owner)`
pub fn encode_balance_of(owner: Address) -> Bytes {
    IERC721::balanceOfCall { owner }.abi_encode().into()
}

/// Encode `symbol()`
pub fn encode_symbol() -> Bytes {
    IERC721::symbolCall {}.abi_encode().into()
}

/// Decode the NFT count returned by `balanceOf`
pub fn decode_balance_of(data: &[u8]) -> Result<U256, alloy::sol_types::Error> {
    IERC721::balanceOfCall::abi_decode_returns(data)
}

/// Decode the `string` returned by `symbol`
pub fn decode_symbol(data: &[u8]) -> Result<String, alloy::sol_types::Error> {
    IERC721::symbolCall::abi_decode_returns(data)
}
