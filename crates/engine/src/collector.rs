//! Fan-out collector (§4.3): one task per fetcher, fold through a
//! reducer, fail fast on the first error.

use lrc_core::error::{RecoverError, Result};
use lrc_core::traits::{Fetcher, Reducer};
use lrc_core::RegionInfos;
use tokio_util::sync::CancellationToken;

enum FetchOutcome {
    Ok(RegionInfos),
    Err(RecoverError),
}

/// Runs `fetchers` in parallel and folds successful results through
/// `reducer` in arrival order. Other tasks are left to finish even
/// after the first error is observed (§4.3: "their results are
/// discarded"); this function does not cancel them itself, matching the
/// upstream collector's behavior of draining exactly `fetchers.len()`
/// channel messages — `cancel` is forwarded to every fetcher so a
/// caller-driven cancellation still aborts each in-flight remote
/// process (§5, §12).
pub async fn collect(
    fetchers: Vec<Box<dyn Fetcher>>,
    reducer: &mut impl Reducer,
    cancel: &CancellationToken,
) -> Result<RegionInfos> {
    let count = fetchers.len();
    let (tx, mut rx) = tokio::sync::mpsc::channel::<FetchOutcome>(count.max(1));

    for fetcher in fetchers {
        let tx = tx.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move {
            let outcome = match fetcher.fetch(&cancel).await {
                Ok(infos) => FetchOutcome::Ok(infos),
                Err(e) => FetchOutcome::Err(e),
            };
            // The receiver may already be gone if an earlier error
            // short-circuited `collect`; that's fine, we only tried
            // our best to report.
            let _ = tx.send(outcome).await;
        });
    }
    drop(tx);

    let mut accum = RegionInfos::new();
    for _ in 0..count {
        match rx.recv().await {
            Some(FetchOutcome::Ok(infos)) => {
                accum = reducer.merge(accum, infos);
            }
            Some(FetchOutcome::Err(e)) => {
                return Err(RecoverError::CollectFailed(Box::new(e)));
            }
            None => break,
        }
    }

    Ok(accum)
}

#[cfg(test)]
#[path = "collector_tests.rs"]
mod tests;
