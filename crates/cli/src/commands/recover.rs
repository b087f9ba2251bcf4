//! `learner-recover recover -c <config.yaml>`: loads the recover config
//! and the two topology files it references, then runs the
//! unsafe-recovery orchestrator (§4.5) to completion. Cancelled only by
//! `SIGINT`/`SIGTERM` (§5).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lrc_core::topology::TopologyView;
use lrc_engine::config::{RecoverConfig, TikvCtlPaths};
use lrc_engine::orchestrator::ClusterRescuer;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Deserialize)]
struct TikvCtlFileConfig {
    src: String,
    dest: String,
}

#[derive(Debug, Deserialize)]
struct RecoverFileConfig {
    #[serde(rename = "cluster-version")]
    cluster_version: String,
    #[serde(rename = "cluster-name")]
    cluster_name: String,
    #[serde(rename = "old-topology")]
    old_topology: String,
    #[serde(rename = "new-topology")]
    new_topology: String,
    #[serde(rename = "join-topology")]
    join_topology: String,
    #[serde(rename = "recover-info-file")]
    recover_info_file: String,
    #[serde(rename = "zone-labels", default)]
    zone_labels: BTreeMap<String, String>,
    #[serde(rename = "tikv-ctl")]
    tikv_ctl: TikvCtlFileConfig,
    #[serde(rename = "pd-recover-path")]
    pd_recover_path: String,
}

fn load_config(path: &Path) -> Result<RecoverFileConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading recover config {}", path.display()))?;
    serde_yaml::from_str(&raw).with_context(|| format!("parsing recover config {}", path.display()))
}

pub async fn run(config_path: &Path) -> Result<()> {
    let file_config = load_config(config_path)?;

    let old_topology = TopologyView::load(Path::new(&file_config.old_topology))
        .with_context(|| format!("loading old topology {}", file_config.old_topology))?;
    let new_topology = TopologyView::load(Path::new(&file_config.new_topology))
        .with_context(|| format!("loading new topology {}", file_config.new_topology))?;

    let nodes = old_topology
        .matching_nodes(&file_config.zone_labels)
        .into_iter()
        .cloned()
        .collect::<Vec<_>>();
    anyhow::ensure!(
        !nodes.is_empty(),
        "no surviving nodes matched zone-labels {:?} in {}",
        file_config.zone_labels,
        file_config.old_topology
    );

    let new_topology_pd_servers = new_topology
        .pd_servers
        .iter()
        .map(|pd| (pd.host.clone(), pd.client_port))
        .collect::<Vec<_>>();
    anyhow::ensure!(
        !new_topology_pd_servers.is_empty(),
        "new topology {} declares no pd_servers",
        file_config.new_topology
    );

    let recover_info_path = PathBuf::from(&file_config.recover_info_file);
    let recover_info = lrc_storage::recover_info_store::load(&recover_info_path)
        .with_context(|| format!("loading recover-info file {}", recover_info_path.display()))?;

    let config = RecoverConfig {
        cluster_version: file_config.cluster_version,
        cluster_name: file_config.cluster_name,
        user: old_topology.global.user.clone(),
        ssh_port: old_topology.global.ssh_port,
        nodes,
        new_topology_path: file_config.new_topology,
        new_topology_pd_servers,
        join_topology: file_config.join_topology,
        tikv_ctl: TikvCtlPaths {
            src: file_config.tikv_ctl.src,
            dest: file_config.tikv_ctl.dest,
        },
        pd_recover_path: file_config.pd_recover_path,
    };

    let cancel = CancellationToken::new();
    spawn_signal_handler(cancel.clone());

    ClusterRescuer::new(config, recover_info, cancel)
        .execute()
        .await
        .context("unsafe-recovery orchestrator failed")
}

/// Cancels `cancel` on `SIGINT`/`SIGTERM` (§5 "background token"). Unix
/// only — this tool has no declared Windows support.
fn spawn_signal_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut sigterm = match signal(SignalKind::terminate()) {
                Ok(s) => s,
                Err(_) => return,
            };
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = sigterm.recv() => {}
            }
        }
        #[cfg(not(unix))]
        {
            let _ = tokio::signal::ctrl_c().await;
        }
        tracing::warn!("received shutdown signal, cancelling recovery");
        cancel.cancel();
    });
}
