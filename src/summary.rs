//! Aggregate statistics over a session's final balances

use std::fmt;

use bigdecimal::BigDecimal;
use num_traits::Zero;
use serde::Serialize;

use crate::{types::TokenBalance, utils::balance_utils::format_balance};

/// Totals over the final balance array
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceSummary {
    /// Number of queried positions
    pub total: usize,
    /// Positions whose balance was observed
    pub success_count: usize,
    /// Fraction of successful positions, 0.0 for an empty list
    pub success_ratio: f64,
    /// Sum over successful positions
    #[serde(serialize_with = "crate::utils::balance_utils::serialize_plain")]
    pub total_balance: BigDecimal,
    pub symbol: String,
}

impl BalanceSummary {
    pub fn from_balances(balances: &[TokenBalance], symbol: impl Into<String>) -> Self {
        let (success_count, total_balance) = balances
            .iter()
            .filter(|tb| tb.success)
            .fold((0, BigDecimal::zero()), |(count, sum), tb| (count + 1, sum + &tb.balance));
        let total = balances.len();
        let success_ratio = if total == 0 {
            0.0
        } else {
            success_count as f64 / total as f64
        };
        Self {
            total,
            success_count,
            success_ratio,
            total_balance,
            symbol: symbol.into(),
        }
    }

    pub fn failed_count(&self) -> usize {
        self.total - self.success_count
    }
}

impl fmt::Display for BalanceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Success: {}/{} ({:.1}%)",
            self.success_count,
            self.total,
            self.success_ratio * 100.0
        )?;
        write!(f, "Total balance: {} {}", format_balance(&self.total_balance, 4), self.symbol)
    }
}
