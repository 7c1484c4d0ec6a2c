//! One balance query session
//!
//! A session binds a checker, submits the whole address list as one batch,
//! then retries whatever the batch left unresolved:
//!
//! ```text
//! detect ──▶ aggregate ──┬─ ok ─────────▶ retry failed positions ──▶ summary
//!                        └─ batch error ─▶ retry every position ───┘
//! ```

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use alloy::primitives::Address;
use log::{info, warn};
use serde::Serialize;

use crate::{
    aggregator::{BatchAggregator, BatchError},
    config::QueryConfig,
    detector::detect_checker,
    errors::QueryError,
    reconciler::{collect_retry_tasks, reconcile, retry_all},
    summary::BalanceSummary,
    traits::{BalanceChecker, SharedConnector},
    types::{TokenBalance, TokenMeta, TokenType},
};

/// Outcome of a session
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    /// Token metadata bound at detection
    pub token: TokenMeta,
    pub token_address: Address,
    /// One entry per input address, in input order
    pub balances: Vec<TokenBalance>,
    pub summary: BalanceSummary,
    /// Positions sent to the individual fallback
    pub retried: usize,
    /// Fallback queries that resolved a balance
    pub recovered: usize,
    pub elapsed: Duration,
}

/// Query session over one connector
pub struct BalanceSession {
    connector: SharedConnector,
    config: QueryConfig,
}

impl BalanceSession {
    pub fn new(connector: SharedConnector, config: QueryConfig) -> Self {
        Self { connector, config }
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Query the balance of every address for `token`
    ///
    /// `explicit` skips detection and binds the given token type directly.
    /// Duplicated addresses are queried once per occurrence.
    pub async fn run(
        &self,
        token: Address,
        explicit: Option<TokenType>,
        addresses: &[Address],
    ) -> Result<SessionReport, QueryError> {
        let started = Instant::now();

        let checker = detect_checker(
            self.connector.clone(),
            token,
            explicit,
            &self.config.native_symbol,
        )
        .await?;
        let meta = checker.meta().clone();

        let aggregator = BatchAggregator::new(self.config.decode_policy);
        let (balances, tasks) = match aggregator
            .query(self.connector.as_ref(), &meta, token, addresses)
            .await
        {
            Ok(balances) => {
                let tasks = collect_retry_tasks(&balances);
                (balances, tasks)
            }
            Err(BatchError::Decode { index, owner, method, reason }) => {
                return Err(QueryError::Decode { index, owner, method, reason });
            }
            Err(e) => {
                warn!("Batch query failed, querying all {} addresses individually: {e}", addresses.len());
                let placeholders: Vec<TokenBalance> = addresses
                    .iter()
                    .map(|&owner| TokenBalance::failed(&meta, token, owner))
                    .collect();
                (placeholders, retry_all(addresses))
            }
        };

        let retried = tasks.len();
        let outcome = reconcile(
            Arc::new(checker),
            balances,
            tasks,
            self.config.effective_concurrency(),
        )
        .await?;

        let summary = BalanceSummary::from_balances(&outcome.balances, meta.symbol.clone());
        let elapsed = started.elapsed();
        info!(
            "Resolved {}/{} balances ({} retried, {} recovered) in {:.2?}",
            summary.success_count, summary.total, retried, outcome.recovered, elapsed
        );

        Ok(SessionReport {
            token: meta,
            token_address: token,
            balances: outcome.balances,
            summary,
            retried,
            recovered: outcome.recovered,
            elapsed,
        })
    }
}
