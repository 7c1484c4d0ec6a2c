//! Wallet address list parsing
//!
//! Address files hold one address per line. Blank lines and lines starting
//! with `#` or `//` are ignored; lines that are not valid addresses are
//! skipped with a warning. Order and duplicates are preserved, since the
//! position of an address is its index in the query result.

use std::{path::Path, str::FromStr};

use alloy::primitives::Address;
use log::warn;

use crate::errors::ConfigError;

/// Result of parsing an address list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedAddresses {
    /// Valid addresses in file order
    pub addresses: Vec<Address>,
    /// Lines rejected as invalid addresses
    pub skipped: Vec<String>,
}

/// Parse an address list from text
pub fn parse_addresses(text: &str) -> ParsedAddresses {
    let mut parsed = ParsedAddresses::default();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
            continue;
        }
        match Address::from_str(line) {
            Ok(address) => parsed.addresses.push(address),
            Err(_) => {
                warn!("Skipping invalid address: {line}");
                parsed.skipped.push(line.to_string());
            }
        }
    }
    parsed
}

/// Read and parse an address file
pub fn load_addresses(path: impl AsRef<Path>) -> Result<ParsedAddresses, ConfigError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    Ok(parse_addresses(&text))
}
