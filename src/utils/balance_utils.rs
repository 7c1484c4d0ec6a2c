//! Balance scaling utilities
//!
//! Converts raw on-chain integers into exact decimal quantities.

use alloy::primitives::U256;
use bigdecimal::{BigDecimal, RoundingMode};
use num_bigint::{BigInt, Sign};
use serde::Serializer;

/// Scale a raw integer balance by `10^-decimals`
///
/// The conversion is exact: `1500000000000000000` with 18 decimals is
/// exactly `1.5`. With `decimals == 0` the raw value is returned unscaled,
/// which is how NFT counts are represented.
///
/// # Example
/// ```
/// use chain_lens::utils::balance_utils::to_decimal;
/// use alloy::primitives::U256;
/// use std::str::FromStr;
///
/// let raw = U256::from(1_500_000_000_000_000_000u128);
/// assert_eq!(to_decimal(raw, 18), bigdecimal::BigDecimal::from_str("1.5").unwrap());
/// ```
pub fn to_decimal(raw: U256, decimals: u8) -> BigDecimal {
    let digits = BigInt::from_bytes_be(Sign::Plus, &raw.to_be_bytes::<32>());
    BigDecimal::new(digits, i64::from(decimals))
}

/// Render a balance with exactly `places` fractional digits, truncating
///
/// Zero renders as `0.0000` at four places; dust below the last place
/// truncates to zero instead of switching to exponent notation.
pub fn format_balance(balance: &BigDecimal, places: i64) -> String {
    let places = places.max(0);
    let (digits, scale) = balance
        .with_scale_round(places, RoundingMode::Down)
        .into_bigint_and_exponent();
    render_plain(&digits, scale)
}

/// Render the exact value in positional notation, never in exponent form
pub fn to_plain_string(balance: &BigDecimal) -> String {
    let (digits, scale) = balance.clone().into_bigint_and_exponent();
    render_plain(&digits, scale)
}

/// Serialize a balance as a plain decimal string
pub fn serialize_plain<S: Serializer>(balance: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&to_plain_string(balance))
}

fn render_plain(digits: &BigInt, scale: i64) -> String {
    let mut out = digits.magnitude().to_string();
    if scale <= 0 {
        if out != "0" {
            out.push_str(&"0".repeat(scale.unsigned_abs() as usize));
        }
    } else {
        let scale = scale as usize;
        if out.len() <= scale {
            out.insert_str(0, &"0".repeat(scale + 1 - out.len()));
        }
        out.insert(out.len() - scale, '.');
    }
    if digits.sign() == Sign::Minus {
        out.insert(0, '-');
    }
    out
}
