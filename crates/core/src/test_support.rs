//! Builders shared by this crate's own tests and by downstream crates'
//! tests (gated the same way the teacher gates its `test-support`
//! feature: available under `#[cfg(test)]` in-crate, and to any crate
//! that opts in via the `test-support` feature).

use chrono::{DateTime, Utc};

use crate::ids::RegionId;
use crate::region::{ApplyState, LocalState, RegionEpoch, RegionRange, RegionState};

#[allow(clippy::too_many_arguments)]
pub fn region_state(
    id: u64,
    start_key: &str,
    end_key: &str,
    epoch_version: u64,
    applied_index: u64,
    timestamp: DateTime<Utc>,
) -> RegionState {
    RegionState {
        region_id: RegionId::new(id),
        host: String::new(),
        data_dir: String::new(),
        apply_state: ApplyState {
            applied_index,
            timestamp,
        },
        local_state: LocalState {
            region: RegionRange {
                start_key: start_key.to_string(),
                end_key: end_key.to_string(),
                region_epoch: RegionEpoch {
                    version: epoch_version,
                },
            },
        },
    }
}
