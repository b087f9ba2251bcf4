use super::*;
use crate::test_support::region_state;
use chrono::TimeZone;

fn ts(hour: u32, min: u32, sec: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, hour, min, sec).unwrap()
}

fn infos_with(state: RegionState) -> RegionInfos {
    let mut infos = RegionInfos::new();
    infos.insert(state);
    infos
}

#[test]
fn rpo_query_with_empty_history_returns_birth() {
    let mut history = ApplyHistory::new();
    history.birth = ts(10, 0, 0);
    let query = region_state(10, "00", "80", 1, 5, ts(10, 0, 2));
    assert_eq!(history.rpo_query(&query), ts(10, 0, 0));
}

#[test]
fn scenario_s5_rpo_baseline() {
    let mut history = ApplyHistory::new();
    history.birth = ts(10, 0, 0);
    let voter = region_state(10, "00", "80", 1, 5, ts(10, 0, 1));
    history.update(&infos_with(voter));

    let learner = region_state(10, "00", "80", 1, 5, ts(10, 0, 2));
    let answer = history.rpo_query(&learner);
    assert_eq!(answer, ts(10, 0, 1));
}

#[test]
fn scenario_s6_rpo_compaction() {
    let mut history = ApplyHistory::new();
    history.birth = ts(9, 0, 0);

    history.update(&infos_with(region_state(10, "00", "80", 1, 1, ts(10, 0, 0))));
    history.update(&infos_with(region_state(10, "00", "80", 1, 2, ts(10, 0, 1))));
    history.update(&infos_with(region_state(10, "00", "80", 1, 3, ts(10, 0, 2))));
    assert_eq!(history.history[&RegionId::new(10)].len(), 3);

    let query_idx2 = region_state(10, "00", "80", 1, 2, ts(10, 0, 5));
    let t2 = history.rpo_query(&query_idx2);
    assert_eq!(t2, ts(10, 0, 1));

    // A fresh voter sample at the same index updates the timestamp in
    // place rather than appending a new entry.
    history.update(&infos_with(region_state(10, "00", "80", 1, 2, ts(10, 0, 9))));
    assert_eq!(history.history[&RegionId::new(10)].len(), 2);

    let t2_again = history.rpo_query(&query_idx2);
    assert_eq!(t2_again, ts(10, 0, 9));
}

#[test]
fn history_monotonicity_invariant() {
    let mut history = ApplyHistory::new();
    history.update(&infos_with(region_state(1, "", "", 1, 1, ts(0, 0, 1))));
    history.update(&infos_with(region_state(1, "", "", 1, 2, ts(0, 0, 2))));
    history.update(&infos_with(region_state(1, "", "", 1, 3, ts(0, 0, 3))));

    let seq = &history.history[&RegionId::new(1)];
    for window in seq.windows(2) {
        assert!(window[0].applied_index() < window[1].applied_index());
    }
}

#[test]
fn rpo_query_is_idempotent_after_compaction() {
    let mut history = ApplyHistory::new();
    history.update(&infos_with(region_state(1, "", "", 1, 1, ts(0, 0, 1))));
    history.update(&infos_with(region_state(1, "", "", 1, 2, ts(0, 0, 2))));

    let query = region_state(1, "", "", 1, 2, ts(0, 0, 9));
    let first = history.rpo_query(&query);
    let second = history.rpo_query(&query);
    assert_eq!(first, second);
}

#[test]
fn max_apply_index_keeps_the_larger_index() {
    let mut reducer = MaxApplyIndex;
    let a = infos_with(region_state(1, "", "", 1, 10, ts(0, 0, 0)));
    let b = infos_with(region_state(1, "", "", 1, 20, ts(0, 0, 1)));
    let merged = reducer.merge(a, b);
    assert_eq!(merged.states[&RegionId::new(1)].applied_index(), 20);
}

#[test]
fn max_apply_index_is_commutative() {
    let mut reducer = MaxApplyIndex;
    let a = infos_with(region_state(1, "", "", 1, 10, ts(0, 0, 0)));
    let b = infos_with(region_state(1, "", "", 1, 20, ts(0, 0, 1)));
    let ab = reducer.merge(a.clone(), b.clone());
    let ba = reducer.merge(b, a);
    assert_eq!(
        ab.states[&RegionId::new(1)].applied_index(),
        ba.states[&RegionId::new(1)].applied_index()
    );
}
