//! Conflict resolver (Core A, §4.4). Keeps an ordered index of accepted,
//! pairwise non-overlapping regions keyed by `start_key`, and a side
//! list of losers to tombstone.
//!
//! Open question (a) from §12/SPEC_FULL.md: rather than only checking
//! the single BTreeMap successor of the incoming region's `end_key` (the
//! upstream source's approach, which a third-or-later-node input can
//! fool into missing a second overlapping accepted interval), this
//! resolver collects *every* accepted region whose interval overlaps the
//! incoming one and settles each pairwise. This keeps invariant 1
//! (pairwise non-overlap) true regardless of node arrival order.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use lrc_core::region::RegionState;
use lrc_core::traits::Reducer;
use lrc_core::RegionInfos;

/// `start_key` ordered with the empty string (−∞ sentinel) sorting
/// before every non-empty key.
#[derive(Debug, Clone, PartialEq, Eq)]
struct StartKey(String);

impl PartialOrd for StartKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StartKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.0.is_empty(), other.0.is_empty()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => self.0.cmp(&other.0),
        }
    }
}

#[derive(Debug, Default)]
pub struct ResolveConflicts {
    accepted: BTreeMap<StartKey, RegionState>,
    pub conflicts: Vec<RegionState>,
}

impl ResolveConflicts {
    pub fn new() -> Self {
        ResolveConflicts::default()
    }

    /// Every accepted region whose interval overlaps `incoming`, found by
    /// walking outward from `incoming`'s position in the ordered index
    /// rather than scanning the whole map (§12(a)).
    ///
    /// `accepted` holds pairwise non-overlapping intervals sorted by
    /// `start_key`, so at most one entry starting strictly before
    /// `incoming` can reach into it (an earlier entry's end would have
    /// to clear the immediate predecessor's start first, which the
    /// non-overlap invariant already rules out), and walking forward
    /// from `incoming`'s start can stop at the first entry that no
    /// longer overlaps — every entry after it starts later still.
    fn overlapping_keys(&self, incoming: &RegionState) -> Vec<StartKey> {
        let incoming_start = StartKey(incoming.start_key().to_string());
        let mut keys = Vec::new();

        if let Some((key, state)) = self.accepted.range(..incoming_start.clone()).next_back() {
            if state.overlaps(incoming) {
                keys.push(key.clone());
            }
        }

        for (key, state) in self.accepted.range(incoming_start..) {
            if state.overlaps(incoming) {
                keys.push(key.clone());
            } else {
                break;
            }
        }

        keys
    }

    /// §4.4 tie-break: the pair strictly greater wins; on a full tie the
    /// incoming region wins.
    fn incoming_wins(incoming: &RegionState, accepted: &RegionState) -> bool {
        let incoming_key = (incoming.epoch_version(), incoming.applied_index());
        let accepted_key = (accepted.epoch_version(), accepted.applied_index());
        incoming_key >= accepted_key
    }

    fn settle_one(&mut self, incoming: RegionState) {
        let overlapping = self.overlapping_keys(&incoming);

        if overlapping.is_empty() {
            self.accepted
                .insert(StartKey(incoming.start_key().to_string()), incoming);
            return;
        }

        let mut incoming_wins_all = true;
        for key in &overlapping {
            let accepted = &self.accepted[key];
            if Self::incoming_wins(&incoming, accepted) {
                // Defer removal until we know the incoming region beats
                // every rival; otherwise we'd need to re-insert losers.
            } else {
                incoming_wins_all = false;
            }
        }

        if incoming_wins_all {
            for key in &overlapping {
                let loser = self.accepted.remove(key).expect("key came from this map");
                self.conflicts.push(loser);
            }
            self.accepted
                .insert(StartKey(incoming.start_key().to_string()), incoming);
        } else {
            self.conflicts.push(incoming);
        }
    }
}

impl Reducer for ResolveConflicts {
    fn merge(&mut self, _a: RegionInfos, b: RegionInfos) -> RegionInfos {
        let mut incoming: Vec<_> = b.states.into_values().collect();
        incoming.sort_by_key(|s| s.region_id);

        if self.accepted.is_empty() {
            // First call: seed the index with all incoming regions
            // unchanged (§4.4).
            for state in incoming {
                self.accepted
                    .insert(StartKey(state.start_key().to_string()), state);
            }
        } else {
            for state in incoming {
                self.settle_one(state);
            }
        }
        self.snapshot()
    }
}

impl ResolveConflicts {
    fn snapshot(&self) -> RegionInfos {
        let mut infos = RegionInfos::new();
        for state in self.accepted.values() {
            infos.insert(state.clone());
        }
        infos
    }
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
