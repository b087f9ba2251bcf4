//! Unsafe-recovery orchestrator (Core A, §4.5). Sequences prepare →
//! stop → unsafe-recover inner sequence → rebuild coordinator → finish,
//! each stage running its per-node work in parallel. Any stage error
//! aborts the whole execution with no rollback — the operator is
//! already running this tool because the cluster is broken.

use futures_util::future::join_all;
use lrc_adapters::remote::{run_ssh, scp_to};
use lrc_adapters::{poll_until_ready, HttpClient, RemoteTiKVCtl};
use lrc_core::error::{RecoverError, RemoteStage, Result};
use lrc_core::traits::Fetcher;
use lrc_core::RecoverInfo;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

use crate::collector::collect;
use crate::config::RecoverConfig;
use crate::resolver::ResolveConflicts;

pub struct ClusterRescuer {
    config: RecoverConfig,
    recover_info: RecoverInfo,
    cancel: CancellationToken,
}

impl ClusterRescuer {
    pub fn new(config: RecoverConfig, recover_info: RecoverInfo, cancel: CancellationToken) -> Self {
        ClusterRescuer {
            config,
            recover_info,
            cancel,
        }
    }

    /// Runs all five stages in strict order (§4.5).
    pub async fn execute(&self) -> Result<()> {
        self.prepare().await?;
        self.stop().await?;
        self.unsafe_recover().await?;
        self.rebuild_coordinator().await?;
        self.finish().await?;
        tracing::info!("cluster recovery completed successfully");
        Ok(())
    }

    /// Stage 1: copy the inspection tool to every node via SCP.
    async fn prepare(&self) -> Result<()> {
        tracing::info!("stage: prepare");
        let tasks = self.config.nodes.iter().map(|node| {
            let src = self.config.tikv_ctl.src.clone();
            let dest = self.config.tikv_ctl.dest.clone();
            let user = self.config.user.clone();
            let host = node.host.clone();
            let ssh_port = node.ssh_port.unwrap_or(self.config.ssh_port);
            let cancel = self.cancel.clone();
            async move {
                tracing::info!(%host, "sending tikv-ctl");
                scp_to(&user, &host, ssh_port, &src, &dest, &cancel).await
            }
        });

        join_all(tasks)
            .await
            .into_iter()
            .collect::<Result<Vec<()>>>()?;
        Ok(())
    }

    /// Stage 2: disable and stop the per-node service unit.
    async fn stop(&self) -> Result<()> {
        tracing::info!("stage: stop");
        let tasks = self.config.nodes.iter().map(|node| {
            let user = self.config.user.clone();
            let host = node.host.clone();
            let port = node.port;
            let ssh_port = node.ssh_port.unwrap_or(self.config.ssh_port);
            let cancel = self.cancel.clone();
            async move {
                tracing::info!(%host, port, "stopping tikv server");
                run_ssh(
                    &user,
                    &host,
                    ssh_port,
                    "sudo",
                    &[
                        "systemctl".to_string(),
                        "disable".to_string(),
                        "--now".to_string(),
                        format!("tikv-{port}.service"),
                    ],
                    RemoteStage::Stop,
                    Some(port),
                    &cancel,
                )
                .await
                .map(|_| ())
            }
        });

        join_all(tasks)
            .await
            .into_iter()
            .collect::<Result<Vec<()>>>()?;
        Ok(())
    }

    /// Stage 3, §4.5.1: drop unapplied logs, collect region dumps,
    /// resolve conflicts, tombstone losers, promote learners.
    async fn unsafe_recover(&self) -> Result<()> {
        tracing::info!("stage: unsafe-recover");
        self.drop_logs().await?;

        let fetchers: Vec<Box<dyn Fetcher>> = self
            .config
            .nodes
            .iter()
            .map(|node| {
                Box::new(RemoteTiKVCtl {
                    controller: self.config.tikv_ctl.dest.clone(),
                    data_dir: node.data_dir.clone(),
                    user: self.config.user.clone(),
                    host: node.host.clone(),
                    ssh_port: node.ssh_port.unwrap_or(self.config.ssh_port),
                }) as Box<dyn Fetcher>
            })
            .collect();

        let mut resolver = ResolveConflicts::new();
        collect(fetchers, &mut resolver, &self.cancel).await?;

        self.tombstone_conflicts(&resolver.conflicts).await?;
        self.promote_learners().await
    }

    async fn drop_logs(&self) -> Result<()> {
        let tasks = self.config.nodes.iter().map(|node| {
            let user = self.config.user.clone();
            let host = node.host.clone();
            let controller = self.config.tikv_ctl.dest.clone();
            let data_dir = node.data_dir.clone();
            let ssh_port = node.ssh_port.unwrap_or(self.config.ssh_port);
            let cancel = self.cancel.clone();
            async move {
                tracing::info!(%host, "dropping unapplied raft logs");
                let db = format!("{data_dir}/db");
                run_ssh(
                    &user,
                    &host,
                    ssh_port,
                    &controller,
                    &[
                        "--db".to_string(),
                        db,
                        "unsafe-recover".to_string(),
                        "drop-unapplied-raftlog".to_string(),
                        "--all-regions".to_string(),
                    ],
                    RemoteStage::DropLogs,
                    None,
                    &cancel,
                )
                .await
                .map(|_| ())
            }
        });

        join_all(tasks)
            .await
            .into_iter()
            .collect::<Result<Vec<()>>>()?;
        Ok(())
    }

    async fn tombstone_conflicts(&self, conflicts: &[lrc_core::region::RegionState]) -> Result<()> {
        let by_host = group_conflicts_by_host(conflicts);

        let tasks = by_host.into_iter().map(|((host, data_dir), ids)| {
            let user = self.config.user.clone();
            let controller = self.config.tikv_ctl.dest.clone();
            let ssh_port = self.config.ssh_port;
            let cancel = self.cancel.clone();
            async move {
                let db = format!("{data_dir}/db");
                let csv = ids.join(",");
                tracing::info!(%host, regions = %csv, "tombstoning conflicting regions");
                run_ssh(
                    &user,
                    &host,
                    ssh_port,
                    &controller,
                    &[
                        "--db".to_string(),
                        db,
                        "tombstone".to_string(),
                        "--force".to_string(),
                        "-r".to_string(),
                        csv,
                    ],
                    RemoteStage::Tombstone,
                    None,
                    &cancel,
                )
                .await
                .map(|_| ())
            }
        });

        join_all(tasks)
            .await
            .into_iter()
            .collect::<Result<Vec<()>>>()?;
        Ok(())
    }

    async fn promote_learners(&self) -> Result<()> {
        let stores = self
            .recover_info
            .store_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");

        let tasks = self.config.nodes.iter().map(|node| {
            let user = self.config.user.clone();
            let host = node.host.clone();
            let port = node.port;
            let controller = self.config.tikv_ctl.dest.clone();
            let data_dir = node.data_dir.clone();
            let ssh_port = node.ssh_port.unwrap_or(self.config.ssh_port);
            let stores = stores.clone();
            let cancel = self.cancel.clone();
            async move {
                tracing::info!(%host, port, "promoting learners");
                let db = format!("{data_dir}/db");
                run_ssh(
                    &user,
                    &host,
                    ssh_port,
                    &controller,
                    &[
                        "--db".to_string(),
                        db,
                        "unsafe-recover".to_string(),
                        "remove-fail-stores".to_string(),
                        "--promote-learner".to_string(),
                        "--all-regions".to_string(),
                        "-s".to_string(),
                        stores,
                    ],
                    RemoteStage::Promote,
                    Some(port),
                    &cancel,
                )
                .await
                .map(|_| ())
            }
        });

        join_all(tasks)
            .await
            .into_iter()
            .collect::<Result<Vec<()>>>()?;
        Ok(())
    }

    /// Stage 4: deploy, start, and recover the one-node coordinator
    /// cluster, then poll until it is ready.
    async fn rebuild_coordinator(&self) -> Result<()> {
        tracing::info!("stage: rebuild coordinator");
        let c = &self.config;

        run_tiup(
            &[
                "cluster",
                "deploy",
                "-y",
                &c.cluster_name,
                &c.cluster_version,
                &c.new_topology_path,
            ],
            &self.cancel,
        )
        .await
        .map_err(|e| stage_failure(e, RecoverError::RebuildCoordinatorFailed))?;

        run_tiup(&["cluster", "start", "-y", &c.cluster_name], &self.cancel)
            .await
            .map_err(|e| stage_failure(e, RecoverError::RebuildCoordinatorFailed))?;

        let (pd_host, pd_client_port) = c
            .new_topology_pd_servers
            .first()
            .cloned()
            .ok_or_else(|| RecoverError::RebuildCoordinatorFailed("no PD servers in new topology".to_string()))?;

        let endpoints = format!("http://{pd_host}:{pd_client_port}");
        run_cancellable(
            Command::new(&c.pd_recover_path).args([
                "-endpoints",
                &endpoints,
                "-cluster-id",
                &self.recover_info.cluster_id,
                "-alloc-id",
                &self.recover_info.alloc_id.to_string(),
            ]),
            &self.cancel,
        )
        .await
        .map_err(|e| stage_failure(e, RecoverError::RebuildCoordinatorFailed))?;

        run_tiup(&["cluster", "restart", "-y", &c.cluster_name], &self.cancel)
            .await
            .map_err(|e| stage_failure(e, RecoverError::RebuildCoordinatorFailed))?;

        let client = HttpClient::new();
        let ready_url = format!("{endpoints}/pd/api/v1/config/replicate");
        poll_until_ready(&client, &ready_url, &self.cancel).await
    }

    /// Stage 5: scale the original learners into the new cluster.
    async fn finish(&self) -> Result<()> {
        tracing::info!("stage: finish");
        run_tiup(
            &[
                "cluster",
                "scale-out",
                "-y",
                &self.config.cluster_name,
                &self.config.join_topology,
            ],
            &self.cancel,
        )
        .await
        .map_err(|e| stage_failure(e, RecoverError::FinishFailed))?;
        Ok(())
    }
}

/// Groups conflicting regions by the (host, data_dir) that owns them,
/// each region id rendered as a string for the `tikv-ctl tombstone -r`
/// CSV argument. Pulled out of `tombstone_conflicts` so the grouping
/// logic is testable without spawning `ssh`.
fn group_conflicts_by_host(
    conflicts: &[lrc_core::region::RegionState],
) -> std::collections::BTreeMap<(String, String), Vec<String>> {
    let mut by_host: std::collections::BTreeMap<(String, String), Vec<String>> =
        std::collections::BTreeMap::new();
    for state in conflicts {
        by_host
            .entry((state.host.clone(), state.data_dir.clone()))
            .or_default()
            .push(state.region_id.to_string());
    }
    by_host
}

/// Runs `tiup args...`, racing it against `cancel`. Returns
/// `RecoverError::Cancelled` untouched on cancellation so callers can
/// propagate it as-is instead of folding it into a stage-specific
/// failure variant.
async fn run_tiup(args: &[&str], cancel: &CancellationToken) -> Result<()> {
    let output = run_cancellable(Command::new("tiup").args(args), cancel).await?;
    if output.status.success() {
        tracing::info!(output = %String::from_utf8_lossy(&output.stdout), "tiup command succeeded");
        Ok(())
    } else {
        tracing::warn!(output = %String::from_utf8_lossy(&output.stderr), "tiup command failed");
        Err(RecoverError::Io(std::io::Error::other(format!(
            "tiup exited with {:?}",
            output.status.code()
        ))))
    }
}

/// Maps a stage's raw error into its named failure variant, letting
/// `Cancelled` pass through untouched (§5, §12).
fn stage_failure(err: RecoverError, wrap: impl FnOnce(String) -> RecoverError) -> RecoverError {
    match err {
        RecoverError::Cancelled => err,
        other => wrap(other.to_string()),
    }
}

/// Spawns `command` and races it against `cancel`, killing the child and
/// returning `RecoverError::Cancelled` if cancellation wins (§5, §12) —
/// the local-process counterpart of `lrc_adapters::remote`'s SSH racing,
/// used here for `tiup` and the coordinator-recovery binary.
async fn run_cancellable(command: &mut Command, cancel: &CancellationToken) -> Result<std::process::Output> {
    let mut child = command
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::piped())
        .spawn()
        .map_err(RecoverError::Io)?;

    let outcome = {
        use tokio::io::AsyncReadExt;
        let work = async {
            let mut stdout = Vec::new();
            let mut stderr = Vec::new();
            if let Some(mut out) = child.stdout.take() {
                out.read_to_end(&mut stdout).await?;
            }
            if let Some(mut err) = child.stderr.take() {
                err.read_to_end(&mut stderr).await?;
            }
            let status = child.wait().await?;
            Ok::<_, std::io::Error>(std::process::Output { status, stdout, stderr })
        };
        tokio::select! {
            result = work => Some(result),
            _ = cancel.cancelled() => None,
        }
    };

    match outcome {
        Some(result) => result.map_err(RecoverError::Io),
        None => {
            let _ = child.start_kill();
            Err(RecoverError::Cancelled)
        }
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
