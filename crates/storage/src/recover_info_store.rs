//! Read/write path for `RecoverInfo` (§4.8), the bridge artifact between
//! the metadata fetcher and the `recover` subcommand.

use std::path::Path;

use lrc_core::error::Result;
use lrc_core::recover_info::RecoverInfo;

use crate::atomic::write_json_atomic;

/// Loads a prior `RecoverInfo` if the file exists and parses cleanly;
/// otherwise starts from an empty one (§4.8: "survive restarts").
pub fn load_or_default(path: &Path) -> RecoverInfo {
    std::fs::read(path)
        .ok()
        .and_then(|data| serde_json::from_slice(&data).ok())
        .unwrap_or_default()
}

pub fn load(path: &Path) -> Result<RecoverInfo> {
    let raw = std::fs::read(path)?;
    Ok(serde_json::from_slice(&raw)?)
}

pub fn save(path: &Path, info: &RecoverInfo) -> Result<()> {
    write_json_atomic(path, info)
}

#[cfg(test)]
#[path = "recover_info_store_tests.rs"]
mod tests;
