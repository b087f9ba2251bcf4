//! `learner-recover rpo -c <config.yaml>`: loads the RPO config and
//! runs the sampling scheduler (§4.7) until `last-for` elapses.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lrc_core::topology::TopologyView;
use lrc_engine::config::RpoConfig;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Deserialize)]
struct RpoFileConfig {
    topology: String,
    #[serde(rename = "voter-labels", default)]
    voter_labels: std::collections::BTreeMap<String, String>,
    #[serde(rename = "learner-labels", default)]
    learner_labels: std::collections::BTreeMap<String, String>,
    #[serde(rename = "tikv-ctl")]
    tikv_ctl: String,
    #[serde(rename = "history-path")]
    history_path: String,
    save: String,
    #[serde(rename = "last-for")]
    last_for: String,
}

fn endpoints(topology: &TopologyView, labels: &std::collections::BTreeMap<String, String>) -> Vec<String> {
    topology
        .matching_nodes(labels)
        .into_iter()
        .map(|node| format!("{}:{}", node.host, node.port))
        .collect()
}

pub async fn run(config_path: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(config_path)
        .with_context(|| format!("reading rpo config {}", config_path.display()))?;
    let file_config: RpoFileConfig = serde_yaml::from_str(&raw)
        .with_context(|| format!("parsing rpo config {}", config_path.display()))?;

    let topology = TopologyView::load(Path::new(&file_config.topology))
        .with_context(|| format!("loading topology {}", file_config.topology))?;

    let voters = endpoints(&topology, &file_config.voter_labels);
    anyhow::ensure!(!voters.is_empty(), "no nodes matched voter-labels in {}", file_config.topology);
    let learners = endpoints(&topology, &file_config.learner_labels);
    anyhow::ensure!(!learners.is_empty(), "no nodes matched learner-labels in {}", file_config.topology);

    let last_for = lrc_core::duration::parse_duration(&file_config.last_for)
        .map_err(|e| anyhow::anyhow!("invalid last-for {:?}: {e}", file_config.last_for))?;

    let config = RpoConfig {
        voters,
        learners,
        tikv_ctl_path: file_config.tikv_ctl,
        history_path: PathBuf::from(file_config.history_path),
        save_path: PathBuf::from(file_config.save),
        last_for,
    };

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("received shutdown signal, stopping rpo sampler");
            signal_cancel.cancel();
        }
    });

    lrc_engine::scheduler::run(&config, cancel)
        .await
        .context("rpo sampling scheduler failed")
}
