use super::*;

#[test]
fn last_metric_sample_picks_the_final_line() {
    let text = "\
# HELP pd_cluster_id cluster id
# TYPE pd_cluster_id gauge
pd_cluster_id 7000111222
pd_cluster_id 7000111333
";
    let (labels, value) = last_metric_sample(text, "pd_cluster_id").unwrap();
    assert!(labels.is_empty());
    assert_eq!(value, 7000111333.0);
}

#[test]
fn last_metric_sample_parses_labels() {
    let text = "pd_cluster_metadata{type=\"cluster9981\"} 1\n";
    let (labels, value) = last_metric_sample(text, "pd_cluster_metadata").unwrap();
    assert_eq!(labels.get("type").map(String::as_str), Some("cluster9981"));
    assert_eq!(value, 1.0);
}

#[test]
fn last_metric_sample_does_not_match_a_longer_metric_name_by_prefix() {
    let text = "pd_cluster_id_total 5\n";
    assert!(last_metric_sample(text, "pd_cluster_id").is_none());
}

#[test]
fn cluster_id_extraction_strips_cluster_prefix() {
    let raw_type = "cluster9981";
    assert_eq!(raw_type.strip_prefix("cluster"), Some("9981"));
}

#[test]
fn cluster_id_extraction_rejects_missing_prefix() {
    // §12(c): a sample lacking the "cluster" prefix is a partial
    // failure for that sub-fetch, not a silently empty string.
    let raw_type = "shard9981";
    assert_eq!(raw_type.strip_prefix("cluster"), None);
}

#[test]
fn alloc_id_adds_headroom_constant() {
    let last_sample = 42u64;
    assert_eq!(last_sample + ALLOC_ID_HEADROOM, 42 + (1u64 << 32));
}
