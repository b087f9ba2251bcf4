use super::*;
use lrc_core::test_support::region_state;
use lrc_core::RegionInfos;
use tempfile::tempdir;

#[test]
fn load_or_new_starts_fresh_when_file_absent() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("history.json");
    let history = load_or_new(&path);
    assert!(history.history.is_empty());
}

#[test]
fn load_or_new_starts_fresh_when_file_malformed() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("history.json");
    std::fs::write(&path, b"not json").unwrap();
    let history = load_or_new(&path);
    assert!(history.history.is_empty());
}

#[test]
fn round_trips_through_save_and_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("history.json");

    let mut history = ApplyHistory::new();
    let mut infos = RegionInfos::new();
    infos.insert(region_state(10, "00", "80", 1, 5, chrono::Utc::now()));
    history.update(&infos);

    save(&path, &history).unwrap();
    let loaded = load_or_new(&path);
    assert_eq!(loaded.history.len(), 1);
}
