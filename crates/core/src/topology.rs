//! Minimal topology loader. The upstream tool delegates this to TiUP's
//! cluster-spec library; since that crate is not a generically reusable
//! published dependency, this module implements the subset of its YAML
//! shape the recovery tool actually reads: global SSH defaults and the
//! `tikv_servers` list with its free-form label map.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RecoverError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalOptions {
    #[serde(default = "default_user")]
    pub user: String,
    #[serde(default = "default_ssh_port", rename = "ssh_port")]
    pub ssh_port: u16,
}

fn default_user() -> String {
    "tidb".to_string()
}

fn default_ssh_port() -> u16 {
    22
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TiKVServerSpec {
    pub host: String,
    #[serde(default = "default_tikv_port")]
    pub port: u16,
    #[serde(default)]
    pub ssh_port: Option<u16>,
    #[serde(default)]
    pub data_dir: String,
    #[serde(default)]
    pub deploy_dir: String,
    #[serde(default)]
    pub config: BTreeMap<String, String>,
}

fn default_tikv_port() -> u16 {
    20160
}

impl TiKVServerSpec {
    /// TiUP stores per-server attribute labels under `config` with a
    /// `server.labels.<k>` dotted key; this flattens that convention
    /// into a plain `k -> v` map for label matching.
    pub fn labels(&self) -> BTreeMap<String, String> {
        let prefix = "server.labels.";
        self.config
            .iter()
            .filter_map(|(k, v)| {
                k.strip_prefix(prefix)
                    .map(|label| (label.to_string(), v.clone()))
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PDServerSpec {
    pub host: String,
    #[serde(default = "default_pd_client_port")]
    pub client_port: u16,
}

fn default_pd_client_port() -> u16 {
    2379
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopologyView {
    #[serde(default)]
    pub global: GlobalOptions,
    #[serde(default)]
    pub tikv_servers: Vec<TiKVServerSpec>,
    #[serde(default)]
    pub pd_servers: Vec<PDServerSpec>,
}

impl TopologyView {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&raw)
            .map_err(|e| RecoverError::ConfigInvalid(format!("{}: {}", path.display(), e)))
    }

    /// Nodes whose labels are a superset of `required` (§3, §8 invariant
    /// 7).
    pub fn matching_nodes(&self, required: &BTreeMap<String, String>) -> Vec<&TiKVServerSpec> {
        self.tikv_servers
            .iter()
            .filter(|node| is_labels_match(required, &node.labels()))
            .collect()
    }
}

/// §8 invariant 7: true iff every key in `required` appears in `actual`
/// with an equal value.
pub fn is_labels_match(required: &BTreeMap<String, String>, actual: &BTreeMap<String, String>) -> bool {
    required.iter().all(|(k, v)| actual.get(k) == Some(v))
}

#[cfg(test)]
#[path = "topology_tests.rs"]
mod tests;
