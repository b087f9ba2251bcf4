//! Atomic JSON file writes: write to a sibling `.tmp` file and rename
//! over the destination, so a crash mid-write never leaves a truncated
//! file behind for the next invocation to choke on.

use std::path::Path;

use lrc_core::error::Result;

pub fn write_json_atomic<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let data = serde_json::to_vec(value)?;
    let tmp_path = path.with_extension("tmp");
    std::fs::write(&tmp_path, &data)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
#[path = "atomic_tests.rs"]
mod tests;
