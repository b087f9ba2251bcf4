//! `ApplyHistory` is the persisted data model Core B maintains: a
//! per-region bounded sequence of apply observations plus the timestamp
//! the history was created. The read-modify-write operations
//! (`update`/`rpo_query`/`save`, with the file lock) live in
//! `lrc-storage`; this module only owns the shape and the in-memory
//! invariants that do not need disk access.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::RegionId;
use crate::region::{RegionState, RegionInfos};
use crate::traits::Reducer;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyHistory {
    pub history: HashMap<RegionId, Vec<RegionState>>,
    pub birth: DateTime<Utc>,
}

impl ApplyHistory {
    pub fn new() -> Self {
        ApplyHistory {
            history: HashMap::new(),
            birth: Utc::now(),
        }
    }

    /// §4.6 `update`: append iff applied_index advanced, else overwrite
    /// the last entry in place (keeps the newest timestamp for an
    /// unchanged index).
    pub fn update(&mut self, infos: &RegionInfos) {
        for state in infos.states.values() {
            let seq = self.history.entry(state.region_id).or_default();
            match seq.last_mut() {
                Some(last) if last.applied_index() == state.applied_index() => {
                    *last = state.clone();
                }
                _ => seq.push(state.clone()),
            }
        }
    }

    /// §4.6 `rpo_query`: first entry whose applied_index >= the query's,
    /// falling back to `birth` for a region with no history. Compacts
    /// the sequence to start at the returned entry as a side effect.
    pub fn rpo_query(&mut self, query: &RegionState) -> DateTime<Utc> {
        let Some(seq) = self.history.get_mut(&query.region_id) else {
            return self.birth;
        };
        if seq.is_empty() {
            return self.birth;
        }

        let mut index = seq.len() - 1;
        for (i, state) in seq.iter().enumerate() {
            if state.applied_index() >= query.applied_index() {
                index = i;
                break;
            }
        }

        let answer = seq[index].apply_timestamp();
        seq.drain(0..index);
        answer
    }
}

impl Default for ApplyHistory {
    fn default() -> Self {
        Self::new()
    }
}

/// Reducer `MaxApplyIndex` (§4.6): for each region in `b`, keep `a`'s
/// entry unless `b`'s has a strictly greater applied_index. Commutative.
#[derive(Debug, Default)]
pub struct MaxApplyIndex;

impl Reducer for MaxApplyIndex {
    fn merge(&mut self, mut a: RegionInfos, b: RegionInfos) -> RegionInfos {
        for (id, state) in b.states {
            match a.states.get(&id) {
                Some(existing) if existing.applied_index() >= state.applied_index() => {}
                _ => {
                    a.states.insert(id, state);
                }
            }
        }
        a
    }
}

#[cfg(test)]
#[path = "apply_history_tests.rs"]
mod tests;
