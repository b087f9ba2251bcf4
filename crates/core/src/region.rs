//! Per-region state as reported by the node-local inspection tool's
//! `raft region --all-regions`, and the `RegionInfos` map it is wrapped
//! in on the wire.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{RecoverError, Result};
use crate::ids::RegionId;

/// Half-open key range `[start_key, end_key)`. An empty `start_key`
/// denotes −∞, an empty `end_key` denotes +∞. Keys are hex strings and
/// are never decoded; only compared lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionEpoch {
    pub version: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionRange {
    #[serde(rename = "start_key")]
    pub start_key: String,
    #[serde(rename = "end_key")]
    pub end_key: String,
    #[serde(rename = "region_epoch")]
    pub region_epoch: RegionEpoch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalState {
    pub region: RegionRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyState {
    pub applied_index: u64,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

/// One observation of one region on one node. `host` and `data_dir` are
/// never present in the tool's own JSON output — the collector attaches
/// them after parsing (§4.1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionState {
    pub region_id: RegionId,

    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub data_dir: String,

    #[serde(rename = "raft_apply_state")]
    pub apply_state: ApplyState,
    #[serde(rename = "region_local_state")]
    pub local_state: LocalState,
}

impl RegionState {
    pub fn start_key(&self) -> &str {
        &self.local_state.region.start_key
    }

    pub fn end_key(&self) -> &str {
        &self.local_state.region.end_key
    }

    pub fn epoch_version(&self) -> u64 {
        self.local_state.region.region_epoch.version
    }

    pub fn applied_index(&self) -> u64 {
        self.apply_state.applied_index
    }

    pub fn apply_timestamp(&self) -> DateTime<Utc> {
        self.apply_state.timestamp
    }

    /// Half-open interval overlap test, `[start_key, end_key)`, treating
    /// an empty bound as the appropriate infinity.
    pub fn overlaps(&self, other: &RegionState) -> bool {
        let (m, n) = (self.start_key(), self.end_key());
        let (p, q) = (other.start_key(), other.end_key());
        (n.is_empty() || n > p) && (q.is_empty() || q > m)
    }
}

/// Mapping `region_id -> RegionState`, merged or as reported by one node.
#[derive(Debug, Clone, Default)]
pub struct RegionInfos {
    pub states: HashMap<RegionId, RegionState>,
}

impl RegionInfos {
    pub fn new() -> Self {
        RegionInfos {
            states: HashMap::new(),
        }
    }

    pub fn insert(&mut self, state: RegionState) {
        self.states.insert(state.region_id, state);
    }

    pub fn attach_node(&mut self, host: &str, data_dir: &str) {
        for state in self.states.values_mut() {
            state.host = host.to_string();
            state.data_dir = data_dir.to_string();
        }
    }
}

impl<'de> Deserialize<'de> for RegionInfos {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let mut wrapper: HashMap<String, HashMap<RegionId, RegionState>> =
            HashMap::deserialize(deserializer)?;
        let states = wrapper
            .remove("region_infos")
            .ok_or_else(|| serde::de::Error::custom("missing region_infos field"))?;
        Ok(RegionInfos { states })
    }
}

/// Parses a node-local tool's `raft region --all-regions` output,
/// enforcing the `region_infos` wrapper key and the per-record required
/// fields (§4.1). `serde`'s own missing-field errors already cover
/// `region_id`/`raft_apply_state`, so this is mostly a thin wrapper that
/// turns a `serde_json::Error` into the domain-specific
/// `MalformedRegionDump`.
pub fn parse_region_dump(raw: &[u8]) -> Result<RegionInfos> {
    serde_json::from_slice::<RegionInfos>(raw)
        .map_err(|e| RecoverError::MalformedRegionDump(e.to_string()))
}

#[cfg(test)]
#[path = "region_tests.rs"]
mod tests;
