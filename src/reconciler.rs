//! Bounded-concurrency fallback for positions the batch left unresolved
//!
//! Every retry task is one single-address query through the session's
//! checker. Tasks are admitted through a semaphore and write their result
//! into a fixed index of one shared array, so completion order does not
//! matter.

use std::sync::Arc;

use alloy::primitives::Address;
use log::{debug, info, warn};
use tokio::{
    sync::{Mutex, Semaphore},
    task::JoinSet,
};

use crate::{
    errors::QueryError,
    traits::BalanceChecker,
    types::{RetryTask, TokenBalance},
};

/// Result of a fallback pass
#[derive(Debug, Clone)]
pub struct ReconcileOutcome {
    /// Final balances, same length and order as the input
    pub balances: Vec<TokenBalance>,
    /// Number of retry tasks that resolved a balance
    pub recovered: usize,
}

/// Retry tasks for every unresolved position
pub fn collect_retry_tasks(balances: &[TokenBalance]) -> Vec<RetryTask> {
    balances
        .iter()
        .enumerate()
        .filter(|(_, tb)| !tb.success)
        .map(|(index, tb)| RetryTask { index, address: tb.owner })
        .collect()
}

/// Retry tasks for every position of the address list
pub fn retry_all(owners: &[Address]) -> Vec<RetryTask> {
    owners
        .iter()
        .enumerate()
        .map(|(index, &address)| RetryTask { index, address })
        .collect()
}

/// Query each retry task individually and merge the results by index
///
/// At most `concurrency` queries are in flight at any time (minimum one).
/// A successful query replaces the slot; a failed one leaves the failure
/// placeholder in place. Each task is attempted exactly once.
pub async fn reconcile<C>(
    checker: Arc<C>,
    balances: Vec<TokenBalance>,
    tasks: Vec<RetryTask>,
    concurrency: usize,
) -> Result<ReconcileOutcome, QueryError>
where
    C: BalanceChecker + ?Sized + 'static,
{
    if tasks.is_empty() {
        return Ok(ReconcileOutcome { balances, recovered: 0 });
    }

    let concurrency = concurrency.max(1);
    info!(
        "Retrying {} addresses individually (concurrency {concurrency})",
        tasks.len()
    );

    let semaphore = Arc::new(Semaphore::new(concurrency));
    let results = Arc::new(Mutex::new(balances));
    let mut join_set = JoinSet::new();

    for task in tasks {
        let permit = semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| QueryError::Internal(format!("fallback admission gate closed: {e}")))?;
        let checker = checker.clone();
        let results = results.clone();

        join_set.spawn(async move {
            let _permit = permit;
            match checker.balance_of(task.address).await {
                Ok(balance) => {
                    let mut guard = results.lock().await;
                    match guard.get_mut(task.index) {
                        Some(slot) => {
                            *slot = TokenBalance::resolved(
                                checker.meta(),
                                slot.token_address,
                                task.address,
                                balance,
                            );
                            debug!("Recovered balance for {} at index {}", task.address, task.index);
                            true
                        }
                        None => {
                            warn!("Retry task index {} out of range", task.index);
                            false
                        }
                    }
                }
                Err(e) => {
                    warn!("Fallback query failed for {}: {e}", task.address);
                    false
                }
            }
        });
    }

    let mut recovered = 0;
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok(true) => recovered += 1,
            Ok(false) => {}
            Err(e) => warn!("Fallback task aborted: {e}"),
        }
    }

    let balances = match Arc::try_unwrap(results) {
        Ok(mutex) => mutex.into_inner(),
        Err(shared) => shared.lock().await.clone(),
    };
    Ok(ReconcileOutcome { balances, recovered })
}
