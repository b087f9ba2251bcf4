use super::*;
use tempfile::tempdir;

#[test]
fn load_or_default_starts_empty_when_absent() {
    let dir = tempdir().unwrap();
    let info = load_or_default(&dir.path().join("missing.json"));
    assert!(info.is_empty());
}

#[test]
fn round_trips_through_save_and_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("recover-info.json");
    let info = RecoverInfo {
        store_ids: vec![1, 2, 3],
        cluster_id: "c1".to_string(),
        alloc_id: 99,
    };
    save(&path, &info).unwrap();
    let loaded = load(&path).unwrap();
    assert_eq!(loaded, info);
}

#[test]
fn load_propagates_error_for_missing_file() {
    let dir = tempdir().unwrap();
    assert!(load(&dir.path().join("missing.json")).is_err());
}
