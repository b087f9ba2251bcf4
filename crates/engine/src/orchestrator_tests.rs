use super::*;
use lrc_core::test_support::region_state;

#[test]
fn group_conflicts_by_host_buckets_by_host_and_data_dir() {
    let mut a = region_state(1, "00", "20", 1, 1, chrono::Utc::now());
    a.host = "node-a".to_string();
    a.data_dir = "/data/tikv".to_string();

    let mut b = region_state(2, "20", "40", 1, 1, chrono::Utc::now());
    b.host = "node-a".to_string();
    b.data_dir = "/data/tikv".to_string();

    let mut c = region_state(3, "40", "60", 1, 1, chrono::Utc::now());
    c.host = "node-b".to_string();
    c.data_dir = "/data/tikv".to_string();

    let grouped = group_conflicts_by_host(&[a, b, c]);

    assert_eq!(grouped.len(), 2);
    let node_a_ids = &grouped[&("node-a".to_string(), "/data/tikv".to_string())];
    assert_eq!(node_a_ids, &vec!["1".to_string(), "2".to_string()]);
    let node_b_ids = &grouped[&("node-b".to_string(), "/data/tikv".to_string())];
    assert_eq!(node_b_ids, &vec!["3".to_string()]);
}

#[test]
fn group_conflicts_by_host_is_empty_for_no_conflicts() {
    assert!(group_conflicts_by_host(&[]).is_empty());
}
