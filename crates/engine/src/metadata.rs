//! Metadata fetcher (§4.8): scrapes the coordinator's REST and metrics
//! endpoints for the three fields `recover` needs (`store_ids`,
//! `cluster_id`, `alloc_id`) and persists them as a `RecoverInfo` file
//! that survives process restarts. Grounds the teacher's agent-registry
//! poll loop (`daemon/src/adapters/agent/mod.rs`), generalized from
//! polling one health endpoint to three independent sub-fetches whose
//! failures are aggregated rather than fatal.

use std::collections::BTreeMap;

use lrc_adapters::HttpClient;
use lrc_core::error::{RecoverError, Result};
use lrc_core::topology::is_labels_match;
use lrc_core::RecoverInfo;
use tokio_util::sync::CancellationToken;

use crate::config::FetchConfig;

/// Headroom added above the coordinator's last-observed allocation
/// counter (§12(b)). Preserved unmodified from the upstream tool.
const ALLOC_ID_HEADROOM: u64 = 1u64 << 32;

pub struct MetadataFetcher {
    client: HttpClient,
    pd_endpoint: String,
    master_labels: BTreeMap<String, String>,
}

impl MetadataFetcher {
    pub fn new(pd_endpoint: impl Into<String>, master_labels: BTreeMap<String, String>) -> Self {
        MetadataFetcher {
            client: HttpClient::new(),
            pd_endpoint: pd_endpoint.into(),
            master_labels,
        }
    }

    async fn fetch_store_ids(&self) -> Result<Vec<u64>> {
        let url = format!("{}/pd/api/v1/stores", self.pd_endpoint);
        let body = self.client.get_json(&url).await?;

        let stores = body
            .get("stores")
            .and_then(|v| v.as_array())
            .ok_or_else(|| RecoverError::Http("stores response missing 'stores' array".to_string()))?;

        let mut ids = Vec::new();
        for entry in stores {
            let store = entry.get("store").unwrap_or(entry);
            let Some(id) = store.get("id").and_then(|v| v.as_u64()) else {
                continue;
            };
            let mut labels = BTreeMap::new();
            if let Some(label_list) = store.get("labels").and_then(|v| v.as_array()) {
                for label in label_list {
                    if let (Some(k), Some(v)) = (
                        label.get("key").and_then(|v| v.as_str()),
                        label.get("value").and_then(|v| v.as_str()),
                    ) {
                        labels.insert(k.to_string(), v.to_string());
                    }
                }
            }
            if is_labels_match(&self.master_labels, &labels) {
                ids.push(id);
            }
        }
        Ok(ids)
    }

    async fn fetch_cluster_id(&self) -> Result<String> {
        let url = format!("{}/metrics", self.pd_endpoint);
        let text = self.client.get_text(&url).await?;
        let (labels, _value) = last_metric_sample(&text, "pd_cluster_metadata")
            .ok_or_else(|| RecoverError::MetadataPartial(vec![RecoverError::Http(
                "pd_cluster_metadata sample not found".to_string(),
            )]))?;

        let raw_type = labels
            .get("type")
            .ok_or_else(|| RecoverError::MetadataPartial(vec![RecoverError::Http(
                "pd_cluster_metadata sample missing 'type' label".to_string(),
            )]))?;

        // §12(c): strip the literal "cluster" prefix; a sample that
        // lacks it is treated as a partial failure, not a panic or an
        // empty-string cluster id.
        raw_type
            .strip_prefix("cluster")
            .map(|s| s.to_string())
            .ok_or_else(|| {
                RecoverError::MetadataPartial(vec![RecoverError::Http(format!(
                    "pd_cluster_metadata type label {raw_type:?} lacks the 'cluster' prefix"
                ))])
            })
    }

    async fn fetch_alloc_id(&self) -> Result<u64> {
        let url = format!("{}/metrics", self.pd_endpoint);
        let text = self.client.get_text(&url).await?;
        let (_labels, value) = last_metric_sample(&text, "pd_cluster_id").ok_or_else(|| {
            RecoverError::MetadataPartial(vec![RecoverError::Http(
                "pd_cluster_id sample not found".to_string(),
            )])
        })?;
        Ok(value as u64 + ALLOC_ID_HEADROOM)
    }

    /// One scrape attempt. Always returns a (possibly partial)
    /// `RecoverInfo`; sub-fetch failures are collected rather than
    /// aborting the whole scrape (§4.8).
    async fn scrape_once(&self) -> (RecoverInfo, Vec<RecoverError>) {
        let mut errors = Vec::new();
        let mut info = RecoverInfo::default();

        match self.fetch_store_ids().await {
            Ok(ids) if !ids.is_empty() => info.store_ids = ids,
            Ok(_) => {}
            Err(e) => errors.push(e),
        }
        match self.fetch_cluster_id().await {
            Ok(id) if !id.is_empty() => info.cluster_id = id,
            Ok(_) => {}
            Err(e) => errors.push(e),
        }
        match self.fetch_alloc_id().await {
            Ok(id) if id != 0 => info.alloc_id = id,
            Ok(_) => {}
            Err(e) => errors.push(e),
        }

        (info, errors)
    }
}

/// Runs the fetch loop: up to `config.repeat` iterations (unbounded if
/// 0), each bounded by `config.timeout`, merging fresh non-empty fields
/// into the persisted state and sleeping `config.interval` in between.
pub async fn run(config: &FetchConfig, cancel: CancellationToken) -> Result<()> {
    tracing::warn!(
        headroom = ALLOC_ID_HEADROOM,
        "alloc_id is computed as last_sample + 2^32, a constant inherited from the upstream tool"
    );

    let fetcher = MetadataFetcher::new(config.pd_endpoint.clone(), config.master_labels.clone());
    let mut state = lrc_storage::recover_info_store::load_or_default(&config.save_path);

    let mut iteration: u32 = 0;
    loop {
        if cancel.is_cancelled() {
            break;
        }
        if config.repeat != 0 && iteration >= config.repeat {
            break;
        }
        iteration += 1;

        let scrape = tokio::time::timeout(config.timeout, fetcher.scrape_once()).await;
        match scrape {
            Ok((fresh, errors)) => {
                if !errors.is_empty() {
                    tracing::warn!(?errors, "metadata scrape partially failed");
                }
                state.merge_partial(&fresh);
                lrc_storage::recover_info_store::save(&config.save_path, &state)?;
            }
            Err(_) => {
                tracing::warn!(timeout = ?config.timeout, "metadata scrape timed out");
            }
        }

        if config.repeat != 0 && iteration >= config.repeat {
            break;
        }

        tokio::select! {
            _ = tokio::time::sleep(config.interval) => {}
            _ = cancel.cancelled() => break,
        }
    }

    Ok(())
}

/// Minimal Prometheus text-exposition-format reader: returns the last
/// sample's label set and value for `metric`, ignoring `#`-comment
/// lines. Good enough for the coordinator's own `/metrics` output,
/// which this tool only ever reads, never validates against the full
/// grammar.
fn last_metric_sample(text: &str, metric: &str) -> Option<(BTreeMap<String, String>, f64)> {
    let mut last = None;
    for line in text.lines() {
        if line.starts_with('#') {
            continue;
        }
        let Some(rest) = line.strip_prefix(metric) else {
            continue;
        };
        if !rest.starts_with('{') && !rest.starts_with(' ') {
            continue; // matched a longer metric name by prefix, not this one
        }

        let (label_part, value_part) = if let Some(stripped) = rest.strip_prefix('{') {
            let Some(end) = stripped.find('}') else { continue };
            (&stripped[..end], stripped[end + 1..].trim())
        } else {
            ("", rest.trim())
        };

        let Ok(value) = value_part.trim().parse::<f64>() else {
            continue;
        };

        let mut labels = BTreeMap::new();
        for pair in label_part.split(',').filter(|s| !s.is_empty()) {
            if let Some((k, v)) = pair.split_once('=') {
                labels.insert(k.trim().to_string(), v.trim().trim_matches('"').to_string());
            }
        }
        last = Some((labels, value));
    }
    last
}

#[cfg(test)]
#[path = "metadata_tests.rs"]
mod tests;
