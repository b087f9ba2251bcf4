use super::*;

fn sample_region(id: u64, start: &str, end: &str, version: u64, applied_index: u64) -> String {
    format!(
        r#"{{"region_id":{id},"raft_apply_state":{{"applied_index":{applied_index},"timestamp":"2026-01-01T00:00:00Z"}},"region_local_state":{{"region":{{"start_key":"{start}","end_key":"{end}","region_epoch":{{"version":{version}}}}}}}}}"#
    )
}

#[test]
fn parses_well_formed_dump() {
    let json = format!(
        r#"{{"region_infos":{{"10":{}}}}}"#,
        sample_region(10, "00", "80", 3, 100)
    );
    let infos = parse_region_dump(json.as_bytes()).unwrap();
    assert_eq!(infos.states.len(), 1);
    let state = &infos.states[&RegionId::new(10)];
    assert_eq!(state.start_key(), "00");
    assert_eq!(state.end_key(), "80");
    assert_eq!(state.epoch_version(), 3);
    assert_eq!(state.applied_index(), 100);
}

#[test]
fn rejects_missing_wrapper_key() {
    let json = format!(r#"{{"10":{}}}"#, sample_region(10, "00", "80", 3, 100));
    let err = parse_region_dump(json.as_bytes()).unwrap_err();
    assert!(matches!(err, RecoverError::MalformedRegionDump(_)));
}

#[test]
fn rejects_missing_region_id() {
    let json = r#"{"region_infos":{"10":{"raft_apply_state":{"applied_index":1,"timestamp":"2026-01-01T00:00:00Z"},"region_local_state":{"region":{"start_key":"","end_key":"","region_epoch":{"version":1}}}}}}"#;
    let err = parse_region_dump(json.as_bytes()).unwrap_err();
    assert!(matches!(err, RecoverError::MalformedRegionDump(_)));
}

#[test]
fn attach_node_fills_host_and_data_dir() {
    let json = format!(
        r#"{{"region_infos":{{"10":{}}}}}"#,
        sample_region(10, "00", "80", 3, 100)
    );
    let mut infos = parse_region_dump(json.as_bytes()).unwrap();
    infos.attach_node("10.0.0.1", "/data/tikv");
    let state = &infos.states[&RegionId::new(10)];
    assert_eq!(state.host, "10.0.0.1");
    assert_eq!(state.data_dir, "/data/tikv");
}

#[yare::parameterized(
    adjacent_no_overlap = { "00", "80", "80", "" , false },
    overlap_with_infinite_end = { "00", "", "40", "90", true },
    disjoint = { "00", "40", "80", "c0", false },
    identical = { "00", "80", "00", "80", true },
)]
fn overlap_matches_half_open_semantics(
    a_start: &str,
    a_end: &str,
    b_start: &str,
    b_end: &str,
    expect_overlap: bool,
) {
    let a = parse_region_dump(
        format!(
            r#"{{"region_infos":{{"1":{}}}}}"#,
            sample_region(1, a_start, a_end, 1, 1)
        )
        .as_bytes(),
    )
    .unwrap();
    let b = parse_region_dump(
        format!(
            r#"{{"region_infos":{{"2":{}}}}}"#,
            sample_region(2, b_start, b_end, 1, 1)
        )
        .as_bytes(),
    )
    .unwrap();
    let a_state = &a.states[&RegionId::new(1)];
    let b_state = &b.states[&RegionId::new(2)];
    assert_eq!(a_state.overlaps(b_state), expect_overlap);
}
