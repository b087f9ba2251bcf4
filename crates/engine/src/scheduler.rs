//! Sampling scheduler (Core B, §4.7): two periodic fan-out workers feed
//! a single main-loop consumer that maintains the apply-history store
//! and emits the RPO estimate. Grounds the teacher's supervisor-select
//! loop (`daemon/src/lifecycle/reconcile.rs`'s multi-channel
//! `tokio::select!`), generalized from a reconciliation event loop to a
//! three-way select over voter samples, learner samples, and a persist
//! tick.

use std::time::Duration as StdDuration;

use chrono::{DateTime, Utc};
use lrc_adapters::LocalTiKVCtl;
use lrc_core::apply_history::{ApplyHistory, MaxApplyIndex};
use lrc_core::error::Result;
use lrc_core::region::RegionInfos;
use lrc_core::traits::Fetcher;
use lrc_storage::history_lock::HistoryLock;
use lrc_storage::{atomic::write_json_atomic, history_store};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::collector::collect;
use crate::config::RpoConfig;

const VOTER_INTERVAL: StdDuration = StdDuration::from_millis(500);
const LEARNER_INTERVAL: StdDuration = StdDuration::from_secs(2);
const PERSIST_INTERVAL: StdDuration = StdDuration::from_secs(1);

/// Wire shape of the RPO estimate (§4.8's sibling format, §6 "RPO
/// JSON"). `lag` is nanoseconds, matching a `time.Duration` rendered as
/// an integer in the upstream tool.
#[derive(Debug, Serialize)]
struct RpoSnapshot {
    lag: u64,
    #[serde(rename = "safe-time")]
    safe_time: DateTime<Utc>,
}

fn fetchers_for(tikv_ctl_path: &str, endpoints: &[String]) -> Vec<Box<dyn Fetcher>> {
    endpoints
        .iter()
        .map(|endpoint| Box::new(LocalTiKVCtl::new(tikv_ctl_path, endpoint.clone())) as Box<dyn Fetcher>)
        .collect()
}

async fn periodic_fetch(
    tikv_ctl_path: String,
    endpoints: Vec<String>,
    interval: StdDuration,
    tx: mpsc::Sender<RegionInfos>,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.tick().await; // first tick fires immediately; skip it to align with the real period
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let fetchers = fetchers_for(&tikv_ctl_path, &endpoints);
                let mut reducer = MaxApplyIndex;
                match collect(fetchers, &mut reducer, &cancel).await {
                    Ok(infos) => {
                        if tx.send(infos).await.is_err() {
                            return;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "periodic sample fetch failed, skipping this tick");
                    }
                }
            }
            _ = cancel.cancelled() => return,
        }
    }
}

/// Runs the RPO sampler until `config.last_for` elapses or `cancel`
/// fires, whichever comes first. Holds the history file lock for the
/// whole run.
pub async fn run(config: &RpoConfig, cancel: CancellationToken) -> Result<()> {
    let _lock = HistoryLock::acquire(&config.history_path)?;
    let mut history = history_store::load_or_new(&config.history_path);

    let (voter_tx, mut voter_rx) = mpsc::channel::<RegionInfos>(1);
    let (learner_tx, mut learner_rx) = mpsc::channel::<RegionInfos>(1);

    let combined_cancel = cancel.clone();
    tokio::spawn(periodic_fetch(
        config.tikv_ctl_path.clone(),
        config.voters.clone(),
        VOTER_INTERVAL,
        voter_tx,
        combined_cancel.clone(),
    ));
    tokio::spawn(periodic_fetch(
        config.tikv_ctl_path.clone(),
        config.learners.clone(),
        LEARNER_INTERVAL,
        learner_tx,
        combined_cancel,
    ));

    let mut persist_ticker = tokio::time::interval(PERSIST_INTERVAL);
    let last_for_sleep = tokio::time::sleep(config.last_for);
    tokio::pin!(last_for_sleep);

    loop {
        tokio::select! {
            biased;

            _ = cancel.cancelled() => {
                tracing::info!("rpo sampler cancelled");
                break;
            }
            _ = &mut last_for_sleep => {
                tracing::info!(last_for = ?config.last_for, "rpo sampler reached its deadline");
                break;
            }
            Some(infos) = voter_rx.recv() => {
                history.update(&infos);
            }
            Some(infos) = learner_rx.recv() => {
                let mut worst_lag = StdDuration::ZERO;
                let mut worst_safe_time = Utc::now();
                for state in infos.states.values() {
                    let voter_time = history.rpo_query(state);
                    let learner_time = state.apply_timestamp();
                    let lag = (learner_time - voter_time).to_std().unwrap_or(StdDuration::ZERO);
                    if lag >= worst_lag {
                        worst_lag = lag;
                        worst_safe_time = voter_time;
                    }
                }
                let snapshot = RpoSnapshot {
                    lag: worst_lag.as_nanos() as u64,
                    safe_time: worst_safe_time,
                };
                tracing::info!(lag_ns = snapshot.lag, safe_time = %snapshot.safe_time, "rpo estimate updated");
                if let Err(e) = write_json_atomic(&config.save_path, &snapshot) {
                    tracing::warn!(error = %e, "failed to write rpo snapshot");
                }
            }
            _ = persist_ticker.tick() => {
                if let Err(e) = history_store::save(&config.history_path, &history) {
                    tracing::warn!(error = %e, "failed to persist apply history");
                }
            }
        }
    }

    history_store::save(&config.history_path, &history)?;
    Ok(())
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
