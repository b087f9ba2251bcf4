//! Shared error taxonomy for the recovery tool. Library crates below the
//! CLI boundary all return `Result<_, RecoverError>`; the CLI flattens
//! this into `anyhow::Error` for reporting.

use thiserror::Error;

/// A single stage of the unsafe-recovery orchestrator that touches remote
/// nodes via the inspection tool or systemctl.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteStage {
    Prepare,
    Stop,
    DropLogs,
    Collect,
    Tombstone,
    Promote,
}

impl std::fmt::Display for RemoteStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RemoteStage::Prepare => "prepare",
            RemoteStage::Stop => "stop",
            RemoteStage::DropLogs => "drop-logs",
            RemoteStage::Collect => "collect",
            RemoteStage::Tombstone => "tombstone",
            RemoteStage::Promote => "promote",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum RecoverError {
    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),

    #[error("remote exec failed in stage {stage} on {host}{}: {source}", port.map(|p| format!(":{p}")).unwrap_or_default())]
    RemoteExec {
        stage: RemoteStage,
        host: String,
        port: Option<u16>,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed region dump: {0}")]
    MalformedRegionDump(String),

    #[error("fan-out collection failed: {0}")]
    CollectFailed(Box<RecoverError>),

    #[error("failed to rebuild coordinator: {0}")]
    RebuildCoordinatorFailed(String),

    #[error("failed to finish recovery: {0}")]
    FinishFailed(String),

    #[error("metadata scrape partially failed: {0:?}")]
    MetadataPartial(Vec<RecoverError>),

    #[error("operation cancelled")]
    Cancelled,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error("http request failed: {0}")]
    Http(String),
}

pub type Result<T> = std::result::Result<T, RecoverError>;
