//! `learner-recover fetch -c <config.yaml>`: loads the fetch config and
//! runs the metadata fetcher (§4.8) standalone, independent of a full
//! `recover` invocation.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use lrc_core::topology::TopologyView;
use lrc_engine::config::FetchConfig;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Deserialize)]
struct FetchFileConfig {
    save: String,
    topology: String,
    #[serde(rename = "master-labels", default)]
    master_labels: BTreeMap<String, String>,
    #[serde(default)]
    repeat: u32,
    interval: String,
    timeout: String,
}

pub async fn run(config_path: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(config_path)
        .with_context(|| format!("reading fetch config {}", config_path.display()))?;
    let file_config: FetchFileConfig = serde_yaml::from_str(&raw)
        .with_context(|| format!("parsing fetch config {}", config_path.display()))?;

    let topology = TopologyView::load(Path::new(&file_config.topology))
        .with_context(|| format!("loading topology {}", file_config.topology))?;
    let pd_server = topology
        .pd_servers
        .first()
        .with_context(|| format!("topology {} declares no pd_servers", file_config.topology))?;
    let pd_endpoint = format!("http://{}:{}", pd_server.host, pd_server.client_port);

    let interval = lrc_core::duration::parse_duration(&file_config.interval)
        .map_err(|e| anyhow::anyhow!("invalid interval {:?}: {e}", file_config.interval))?;
    let timeout = lrc_core::duration::parse_duration(&file_config.timeout)
        .map_err(|e| anyhow::anyhow!("invalid timeout {:?}: {e}", file_config.timeout))?;

    let config = FetchConfig {
        save_path: PathBuf::from(file_config.save),
        pd_endpoint,
        master_labels: file_config.master_labels,
        repeat: file_config.repeat,
        interval: clamp_nonzero(interval),
        timeout: clamp_nonzero(timeout),
    };

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("received shutdown signal, stopping metadata fetcher");
            signal_cancel.cancel();
        }
    });

    lrc_engine::metadata::run(&config, cancel)
        .await
        .context("metadata fetcher failed")
}

fn clamp_nonzero(d: Duration) -> Duration {
    if d.is_zero() {
        Duration::from_millis(1)
    } else {
        d
    }
}
