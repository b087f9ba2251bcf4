//! `LocalTiKVCtl`: the RPO sampler's fetcher variant (§9 "local-process").
//! Invokes the inspection tool against a `--host` endpoint rather than a
//! `--db` data directory, matching the upstream `rpo` component's fetch
//! path, and stamps every returned region with the wall-clock time the
//! fetch was issued (the tool itself does not report one).

use async_trait::async_trait;
use chrono::Utc;
use lrc_core::error::Result;
use lrc_core::region::parse_region_dump;
use lrc_core::traits::Fetcher;
use lrc_core::RegionInfos;
use tokio_util::sync::CancellationToken;

use crate::remote::run_local;

pub struct LocalTiKVCtl {
    controller: String,
    host: String,
}

impl LocalTiKVCtl {
    pub fn new(controller: impl Into<String>, host: impl Into<String>) -> Self {
        LocalTiKVCtl {
            controller: controller.into(),
            host: host.into(),
        }
    }
}

#[async_trait]
impl Fetcher for LocalTiKVCtl {
    async fn fetch(&self, cancel: &CancellationToken) -> Result<RegionInfos> {
        let apply_ts = Utc::now();
        let stdout = run_local(
            &self.controller,
            &["--host", &self.host, "raft", "region", "--all-regions"],
            cancel,
        )
        .await?;

        let mut infos = parse_region_dump(&stdout)?;
        for state in infos.states.values_mut() {
            state.apply_state.timestamp = apply_ts;
        }
        Ok(infos)
    }

    fn label(&self) -> &str {
        &self.host
    }
}
