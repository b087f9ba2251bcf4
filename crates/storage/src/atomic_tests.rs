use super::*;
use serde::Deserialize;
use tempfile::tempdir;

#[derive(Debug, serde::Serialize, Deserialize, PartialEq)]
struct Sample {
    value: u64,
}

#[test]
fn writes_and_reads_back() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");
    write_json_atomic(&path, &Sample { value: 42 }).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    let parsed: Sample = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed, Sample { value: 42 });
}

#[test]
fn leaves_no_tmp_file_behind_on_success() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");
    write_json_atomic(&path, &Sample { value: 1 }).unwrap();
    assert!(!path.with_extension("tmp").exists());
}

#[test]
fn overwrites_existing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");
    write_json_atomic(&path, &Sample { value: 1 }).unwrap();
    write_json_atomic(&path, &Sample { value: 2 }).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    let parsed: Sample = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed, Sample { value: 2 });
}
