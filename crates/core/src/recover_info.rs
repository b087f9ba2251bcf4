//! `RecoverInfo` is the bridge artifact between the metadata fetcher
//! (§4.8) and the unsafe-recovery orchestrator (§4.5): the fetcher
//! writes it, the `recover` subcommand reads it. The wire field names
//! (`storeIDs`/`clusterID`/`allocID`) are camelCase for file-format
//! compatibility with files produced by earlier revisions of this tool.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoverInfo {
    #[serde(rename = "storeIDs", default)]
    pub store_ids: Vec<u64>,
    #[serde(rename = "clusterID", default)]
    pub cluster_id: String,
    #[serde(rename = "allocID", default)]
    pub alloc_id: u64,
}

impl RecoverInfo {
    pub fn is_empty(&self) -> bool {
        self.store_ids.is_empty() && self.cluster_id.is_empty() && self.alloc_id == 0
    }

    /// Merges fresh non-zero/non-empty fields from `fresh` into `self`,
    /// leaving a field untouched when the fresh scrape came back empty
    /// for it (§4.8: "preserves prior fields when a fresh scrape returns
    /// partial data").
    pub fn merge_partial(&mut self, fresh: &RecoverInfo) {
        if !fresh.store_ids.is_empty() {
            self.store_ids = fresh.store_ids.clone();
        }
        if !fresh.cluster_id.is_empty() {
            self.cluster_id = fresh.cluster_id.clone();
        }
        if fresh.alloc_id != 0 {
            self.alloc_id = fresh.alloc_id;
        }
    }
}

#[cfg(test)]
#[path = "recover_info_tests.rs"]
mod tests;
