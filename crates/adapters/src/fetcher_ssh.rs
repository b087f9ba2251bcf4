//! `RemoteTiKVCtl`: the unsafe-recovery orchestrator's fetcher variant
//! (§9 "SSH-wrapped"), one per surviving node. Issues `raft region
//! --all-regions` over SSH and attaches `host`/`data_dir` to every
//! returned region — fields the inspection tool itself never reports
//! (§4.1).

use async_trait::async_trait;
use lrc_core::error::{RemoteStage, Result};
use lrc_core::region::parse_region_dump;
use lrc_core::traits::Fetcher;
use lrc_core::RegionInfos;
use tokio_util::sync::CancellationToken;

use crate::remote::run_ssh;

pub struct RemoteTiKVCtl {
    pub controller: String,
    pub data_dir: String,
    pub user: String,
    pub host: String,
    pub ssh_port: u16,
}

#[async_trait]
impl Fetcher for RemoteTiKVCtl {
    async fn fetch(&self, cancel: &CancellationToken) -> Result<RegionInfos> {
        let db_path = format!("{}/db", self.data_dir);
        let args = vec![
            "--db".to_string(),
            db_path,
            "raft".to_string(),
            "region".to_string(),
            "--all-regions".to_string(),
        ];

        let output = run_ssh(
            &self.user,
            &self.host,
            self.ssh_port,
            &self.controller,
            &args,
            RemoteStage::Collect,
            None,
            cancel,
        )
        .await?;

        let mut infos = parse_region_dump(&output.stdout)?;
        infos.attach_node(&self.host, &self.data_dir);
        Ok(infos)
    }

    fn label(&self) -> &str {
        &self.host
    }
}
