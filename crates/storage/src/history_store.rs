//! Read/write path for `ApplyHistory` (§4.6). The in-memory update and
//! query logic lives in `lrc_core::apply_history`; this module is just
//! the disk boundary: load-or-create at startup, atomic save.

use std::path::Path;

use lrc_core::apply_history::ApplyHistory;
use lrc_core::error::Result;

use crate::atomic::write_json_atomic;

/// Loads the history from `path` if present and well-formed; otherwise
/// starts from a fresh history with `birth = now` (§4.7 "Startup loads
/// the history... otherwise starts from a fresh ApplyHistory").
pub fn load_or_new(path: &Path) -> ApplyHistory {
    match std::fs::read(path) {
        Ok(data) => match serde_json::from_slice(&data) {
            Ok(history) => history,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "history file is malformed, starting fresh");
                ApplyHistory::new()
            }
        },
        Err(_) => ApplyHistory::new(),
    }
}

pub fn save(path: &Path, history: &ApplyHistory) -> Result<()> {
    write_json_atomic(path, history)
}

#[cfg(test)]
#[path = "history_store_tests.rs"]
mod tests;
