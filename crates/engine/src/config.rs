//! In-memory configuration shapes consumed by the engine crate's
//! orchestrators. The CLI crate owns YAML parsing (§9 of SPEC_FULL.md);
//! these structs are what a parsed config is turned into before being
//! handed to the engine.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use lrc_core::topology::TiKVServerSpec;

#[derive(Debug, Clone)]
pub struct TikvCtlPaths {
    pub src: String,
    pub dest: String,
}

#[derive(Debug, Clone)]
pub struct RecoverConfig {
    pub cluster_version: String,
    pub cluster_name: String,
    pub user: String,
    pub ssh_port: u16,
    pub nodes: Vec<TiKVServerSpec>,
    pub new_topology_path: String,
    pub new_topology_pd_servers: Vec<(String, u16)>,
    pub join_topology: String,
    pub tikv_ctl: TikvCtlPaths,
    pub pd_recover_path: String,
}

#[derive(Debug, Clone)]
pub struct RpoConfig {
    pub voters: Vec<String>,
    pub learners: Vec<String>,
    pub tikv_ctl_path: String,
    pub history_path: PathBuf,
    pub save_path: PathBuf,
    pub last_for: Duration,
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub save_path: PathBuf,
    pub pd_endpoint: String,
    pub master_labels: BTreeMap<String, String>,
    pub repeat: u32,
    pub interval: Duration,
    pub timeout: Duration,
}
